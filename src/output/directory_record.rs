// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{Datelike, Utc};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  output::{Render, draw::Draw, draw::load_font, save_image_file::write_image},
  record::{ClassifiedImage, ClassifiedRecord},
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

impl From<super::save_image_file::SaveImageFileError> for DirectoryRecordOutputError {
  fn from(err: super::save_image_file::SaveImageFileError) -> Self {
    use super::save_image_file::SaveImageFileError;
    match err {
      SaveImageFileError::IoError(e) => DirectoryRecordOutputError::IoError(e),
      SaveImageFileError::ImageError(e) => DirectoryRecordOutputError::ImageError(e),
      SaveImageFileError::JsonError(e) => DirectoryRecordOutputError::JsonError(e),
      SaveImageFileError::SchemeMismatch(_) => DirectoryRecordOutputError::SchemeMismatch,
    }
  }
}

/// 会话目录输出。
///
/// 每条分类结果存为一张带标签横幅的图片, 按日期分层命名;
/// 整个会话的记录列表另存为目录下的 records.json。
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  draw: Draw,
  frame_counters: Arc<Mutex<u16>>,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let font = url
      .query_pairs()
      .find(|(k, _)| k == "font")
      .and_then(|(_, v)| load_font(std::path::Path::new(v.as_ref())));

    Ok(DirectoryRecordOutput {
      directory: PathBuf::from(url.path()),
      draw: Draw::default().with_font(font),
      frame_counters: Arc::new(Mutex::new(0)),
    })
  }
}

impl DirectoryRecordOutput {
  fn frame_id(&self) -> u16 {
    let mut counter = self.frame_counters.lock().unwrap();
    let id = *counter + 1;
    *counter = id;
    id
  }

  fn frame_path(&self) -> PathBuf {
    let now = Utc::now();
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));

    directory.join(format!(
      "{}-{:04X}.png",
      now.format("%H-%M-%S"),
      self.frame_id()
    ))
  }
}

impl Render<ClassifiedImage> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(&self, result: &ClassifiedImage) -> Result<(), Self::Error> {
    let mut image = result.image.clone();
    self
      .draw
      .draw_label_on_image(&mut image, &result.record.display_label());

    let path = self.frame_path();
    write_image(&path, &image)?;
    warn!("保存分类结果到文件: {}", path.display());

    Ok(())
  }
}

impl Render<Vec<ClassifiedRecord>> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(&self, result: &Vec<ClassifiedRecord>) -> Result<(), Self::Error> {
    std::fs::create_dir_all(&self.directory)?;
    let path = self.directory.join("records.json");
    std::fs::write(&path, serde_json::to_string_pretty(result)?)?;
    warn!("保存会话记录到文件: {}", path.display());
    Ok(())
  }
}
