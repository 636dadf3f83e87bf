// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/input/v4l_input.rs - V4L 摄像头输入
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use thiserror::Error;
use tracing::error;
use url::Url;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;

use crate::{FromUrl, input::SourceImage};

#[derive(Error, Debug)]
pub enum CameraInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(std::io::Error),
  #[error("V4L error: {0}")]
  V4lError(String),
  #[error("Unsupported pixel format")]
  UnsupportedPixelFormat,
}

impl From<std::io::Error> for CameraInputError {
  fn from(err: std::io::Error) -> Self {
    CameraInputError::IoError(err)
  }
}

const V4L_SCHEME: &str = "v4l";

/// V4L 摄像头单发输入: 抓取一帧缩略分辨率图像后即结束
pub struct CameraInput {
  device_path: String,
  width: usize,
  height: usize,
  taken: bool,
}

impl FromUrl for CameraInput {
  type Error = CameraInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != V4L_SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        V4L_SCHEME,
        url.scheme()
      );
      return Err(CameraInputError::SchemaMismatch);
    }

    // 期望形式: v4l:///dev/video0
    let device_path = if url.path().is_empty() {
      "/dev/video0".to_string()
    } else {
      url.path().to_string()
    };

    // 打开设备验证可用性并读取当前输出格式
    let device = v4l::Device::with_path(&device_path)
      .map_err(|e| CameraInputError::V4lError(e.to_string()))?;

    let format = device
      .format()
      .map_err(|e| CameraInputError::V4lError(e.to_string()))?;

    Ok(CameraInput {
      device_path,
      width: format.width as usize,
      height: format.height as usize,
      taken: false,
    })
  }
}

impl CameraInput {
  fn capture_frame(&mut self) -> Result<Vec<u8>, CameraInputError> {
    let mut device = v4l::Device::with_path(&self.device_path)
      .map_err(|e| CameraInputError::V4lError(e.to_string()))?;

    let mut stream =
      v4l::io::mmap::Stream::with_buffers(&mut device, v4l::buffer::Type::VideoCapture, 4)
        .map_err(|e| CameraInputError::V4lError(e.to_string()))?;

    let (buf, _meta) = stream
      .next()
      .map_err(|e| CameraInputError::V4lError(e.to_string()))?;

    Ok(buf.to_vec())
  }
}

impl Iterator for CameraInput {
  type Item = SourceImage;

  fn next(&mut self) -> Option<Self::Item> {
    if self.taken {
      return None;
    }
    self.taken = true;

    match self.capture_frame() {
      Ok(data) => {
        // 假定设备输出 RGB24; 其它像素格式需要先经设备侧转换
        let expected = self.width * self.height * 3;
        if data.len() < expected {
          error!("Captured buffer size mismatch");
          return None;
        }

        let image = RgbImage::from_raw(self.width as u32, self.height as u32, data[..expected].to_vec())?;
        Some(SourceImage {
          image,
          index: 0,
          source: self.device_path.clone(),
        })
      }
      Err(e) => {
        error!("Failed to capture frame: {}", e);
        None
      }
    }
  }
}
