// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{error, warn};
use url::Url;

use crate::{FromUrl, input::SourceImage};

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(image::ImageError),
}

impl From<std::io::Error> for ImageFileInputError {
  fn from(err: std::io::Error) -> Self {
    ImageFileInputError::IoError(err)
  }
}

impl From<image::ImageError> for ImageFileInputError {
  fn from(err: image::ImageError) -> Self {
    ImageFileInputError::ImageLoadError(err)
  }
}

fn open_and_decode(path: &Path) -> Result<RgbImage, ImageFileInputError> {
  let image = ImageReader::open(path)?.decode()?;
  // 忽略透明通道
  Ok(image.into_rgb8())
}

const READ_IMAGE_FILE_SCHEME: &str = "image";

/// 单张图像文件输入, 仅产出一帧
pub struct ImageFileInput {
  image: Option<RgbImage>,
  source: String,
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != READ_IMAGE_FILE_SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        READ_IMAGE_FILE_SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemaMismatch);
    }

    let path = url.path();
    let image = open_and_decode(Path::new(path))?;

    Ok(ImageFileInput {
      image: Some(image),
      source: path.to_string(),
    })
  }
}

impl Iterator for ImageFileInput {
  type Item = SourceImage;

  fn next(&mut self) -> Option<Self::Item> {
    self.image.take().map(|image| SourceImage {
      image,
      index: 0,
      source: self.source.clone(),
    })
  }
}

/// 多选图库输入。
///
/// 按给定顺序逐张解码; 解码失败的图片整批跳过, 只记一条警告,
/// 不产生逐项错误报告。产出帧保留原始输入序号。
pub struct GalleryInput {
  paths: std::iter::Enumerate<std::vec::IntoIter<PathBuf>>,
}

impl GalleryInput {
  pub fn new(paths: Vec<PathBuf>) -> Self {
    GalleryInput {
      paths: paths.into_iter().enumerate(),
    }
  }
}

impl Iterator for GalleryInput {
  type Item = SourceImage;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let (index, path) = self.paths.next()?;
      match open_and_decode(&path) {
        Ok(image) => {
          return Some(SourceImage {
            image,
            index,
            source: path.display().to_string(),
          });
        }
        Err(e) => {
          warn!("跳过无法解码的图片 {}: {}", path.display(), e);
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  fn write_png(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    let image = RgbImage::from_pixel(8, 8, Rgb(color));
    image.save(&path).unwrap();
    path
  }

  #[test]
  fn gallery_skips_undecodable_images_and_keeps_input_numbering() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_png(dir.path(), "a.png", [255, 0, 0]);
    let broken = dir.path().join("b.png");
    std::fs::write(&broken, b"not an image").unwrap();
    let third = write_png(dir.path(), "c.png", [0, 255, 0]);

    let frames: Vec<SourceImage> = GalleryInput::new(vec![first, broken, third]).collect();

    let indices: Vec<usize> = frames.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 2]);
  }

  #[test]
  fn gallery_preserves_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<PathBuf> = (0..4)
      .map(|i| write_png(dir.path(), &format!("{i}.png"), [i as u8, 0, 0]))
      .collect();

    let frames: Vec<SourceImage> = GalleryInput::new(paths).collect();
    let indices: Vec<usize> = frames.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
  }

  #[test]
  fn single_file_input_yields_exactly_one_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "one.png", [1, 2, 3]);

    let url = Url::parse(&format!("image://{}", path.display())).unwrap();
    let mut input = ImageFileInput::from_url(&url).unwrap();

    assert!(input.next().is_some());
    assert!(input.next().is_none());
  }

  #[test]
  fn single_file_input_rejects_wrong_scheme() {
    let url = Url::parse("v4l:///dev/video0").unwrap();
    let result = ImageFileInput::from_url(&url);
    assert!(matches!(result, Err(ImageFileInputError::SchemaMismatch)));
  }
}
