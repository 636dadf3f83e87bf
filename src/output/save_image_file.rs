// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/output/save_image_file.rs - 保存图像文件
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::{Path, PathBuf};

use image::RgbImage;
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  output::{Render, draw::Draw, draw::load_font},
  record::{ClassifiedImage, ClassifiedRecord},
};

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

/// 把图像写到目标路径, 需要时先创建父目录
pub(crate) fn write_image(path: &Path, image: &RgbImage) -> Result<(), SaveImageFileError> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)?;
  }

  image.save(path)?;
  Ok(())
}

impl From<SaveImageFileError> for super::chart::ChartOutputError {
  fn from(err: SaveImageFileError) -> Self {
    match err {
      SaveImageFileError::IoError(e) => super::chart::ChartOutputError::IoError(e),
      SaveImageFileError::ImageError(e) => super::chart::ChartOutputError::ImageError(e),
      SaveImageFileError::JsonError(e) => super::chart::ChartOutputError::JsonError(e),
      SaveImageFileError::SchemeMismatch(s) => super::chart::ChartOutputError::SchemeMismatch(s),
    }
  }
}

/// 单文件图像输出: 在图像上画标签横幅后保存,
/// 会话记录以同名 JSON 文件放在旁边
pub struct SaveImageFileOutput {
  path: PathBuf,
  draw: Draw,
}

impl FromUrlWithScheme for SaveImageFileOutput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(SaveImageFileError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    let font = url
      .query_pairs()
      .find(|(k, _)| k == "font")
      .and_then(|(_, v)| load_font(Path::new(v.as_ref())));

    Ok(SaveImageFileOutput {
      path: PathBuf::from(url.path()),
      draw: Draw::default().with_font(font),
    })
  }
}

impl Render<ClassifiedImage> for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn render_result(&self, result: &ClassifiedImage) -> Result<(), Self::Error> {
    let mut image = result.image.clone();
    self
      .draw
      .draw_label_on_image(&mut image, &result.record.display_label());

    write_image(&self.path, &image)?;
    warn!("保存图像到文件: {}", self.path.display());

    Ok(())
  }
}

impl Render<Vec<ClassifiedRecord>> for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn render_result(&self, result: &Vec<ClassifiedRecord>) -> Result<(), Self::Error> {
    let json_path = self.path.with_extension("json");
    std::fs::write(&json_path, serde_json::to_string_pretty(result)?)?;
    warn!("保存记录到文件: {}", json_path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use image::Rgb;

  fn classified(label: &str) -> ClassifiedImage {
    ClassifiedImage {
      image: RgbImage::from_pixel(48, 48, Rgb([9, 9, 9])),
      record: ClassifiedRecord {
        source: "test.png".to_string(),
        model: "MobileNetV2Quantized".to_string(),
        label: label.to_string(),
        class_id: 3,
        elapsed_ms: 7,
        timestamp: Utc::now(),
      },
    }
  }

  #[test]
  fn renders_annotated_image_and_session_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.png");
    let url = Url::parse(&format!("image://{}", path.display())).unwrap();

    let output = SaveImageFileOutput::from_url(&url).unwrap();
    let item = classified("cat");
    output.render_result(&item).unwrap();
    output.render_result(&vec![item.record]).unwrap();

    assert!(path.exists());
    assert!(path.with_extension("json").exists());

    let json: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(path.with_extension("json")).unwrap())
        .unwrap();
    assert_eq!(json[0]["label"], "cat");
    assert_eq!(json[0]["class_id"], 3);
  }

  #[test]
  fn rejects_wrong_scheme() {
    let url = Url::parse("folder:///tmp/out").unwrap();
    assert!(matches!(
      SaveImageFileOutput::from_url(&url),
      Err(SaveImageFileError::SchemeMismatch(_))
    ));
  }
}
