// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/model.rs - 模型
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::{Path, PathBuf};

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 分类模型在加载时固定下来的输入尺寸
pub trait InputSized {
  /// 输入尺寸 (宽, 高)
  fn input_size(&self) -> (u32, u32);
}

/// 一次前向推理的结果: 得分最高的类别下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyResult {
  pub class_id: u32,
}

pub trait WithLabel: Sized + std::fmt::Debug {
  fn to_label_str(&self) -> String;
  fn to_label_id(&self) -> u32;
  fn from_label_id(id: u32) -> Self;
}

/// 内置的 MobileNetV2 量化模型名称
pub const MOBILENET_V2_QUANTIZED: &str = "MobileNetV2Quantized";
/// 内置的 ResNet50 量化模型名称
pub const RESNET50_QUANTIZED: &str = "ResNet50Quantized";

/// 按固定名称解析内置模型对应的资源文件名
pub fn model_asset_file(name: &str) -> Option<&'static str> {
  match name {
    MOBILENET_V2_QUANTIZED => Some("MobileNetV2_cifar10_fp32_quant.tflite"),
    RESNET50_QUANTIZED => Some("ResNet50_cifar10_fp32_quant.tflite"),
    _ => None,
  }
}

/// 把模型名称或文件路径解析为模型文件路径。
/// 内置名称在资源目录下查找, 其余输入原样当作路径。
pub fn resolve_model_path(assets: &Path, name_or_path: &str) -> PathBuf {
  match model_asset_file(name_or_path) {
    Some(file) => assets.join(file),
    None => PathBuf::from(name_or_path),
  }
}

mod cifar10;
pub use self::cifar10::{CIFAR10_NUM_CLASSES, Cifar10Label};

mod classifier;
pub use self::classifier::{ClassifierError, TfliteClassifier, TfliteClassifierBuilder, argmax};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtin_names_resolve_into_assets_dir() {
    let path = resolve_model_path(Path::new("assets"), MOBILENET_V2_QUANTIZED);
    assert_eq!(
      path,
      Path::new("assets").join("MobileNetV2_cifar10_fp32_quant.tflite")
    );

    let path = resolve_model_path(Path::new("assets"), RESNET50_QUANTIZED);
    assert_eq!(
      path,
      Path::new("assets").join("ResNet50_cifar10_fp32_quant.tflite")
    );
  }

  #[test]
  fn other_names_are_treated_as_paths() {
    let path = resolve_model_path(Path::new("assets"), "/tmp/custom.tflite");
    assert_eq!(path, Path::new("/tmp/custom.tflite"));
  }
}
