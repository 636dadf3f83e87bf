// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/input.rs - 图像输入源模块
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;

mod read_image_file;
pub use self::read_image_file::{GalleryInput, ImageFileInput, ImageFileInputError};

#[cfg(feature = "camera")]
mod v4l_input;
#[cfg(feature = "camera")]
pub use self::v4l_input::{CameraInput, CameraInputError};

/// 已解码的一帧输入图像
pub struct SourceImage {
  /// RGB 图像数据
  pub image: RgbImage,
  /// 在输入列表中的序号 (解码失败的图片序号留空不补)
  pub index: usize,
  /// 来源描述 (文件路径或设备路径)
  pub source: String,
}
