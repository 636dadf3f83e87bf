// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/output/draw.rs - 分类结果可视化
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use tracing::warn;

// 文本渲染常量
const LABEL_FONT_SIZE: f32 = 20.0;
const LABEL_TEXT_HEIGHT: i32 = 24;
const LABEL_TEXT_VERTICAL_PADDING: i32 = 2;
const LABEL_COLOR: [u8; 3] = [0, 0, 255]; // 蓝色

/// 在图像上绘制分类标签横幅。
///
/// 字体在运行时加载; 加载失败时退化为只画色条, 不画文字。
pub struct Draw {
  font_size: f32,
  label_text_height: i32,
  label_text_vertical_padding: i32,
  font: Option<FontVec>,
  label_color: [u8; 3],
}

impl Default for Draw {
  fn default() -> Self {
    Self {
      font_size: LABEL_FONT_SIZE,
      label_text_height: LABEL_TEXT_HEIGHT,
      label_text_vertical_padding: LABEL_TEXT_VERTICAL_PADDING,
      label_color: LABEL_COLOR,
      font: None,
    }
  }
}

/// 尝试从路径加载字体, 失败时记警告并返回 None
pub fn load_font(path: &Path) -> Option<FontVec> {
  match std::fs::read(path) {
    Ok(data) => match FontVec::try_from_vec(data) {
      Ok(font) => Some(font),
      Err(e) => {
        warn!("字体文件无效 {}: {}", path.display(), e);
        None
      }
    },
    Err(e) => {
      warn!("无法读取字体文件 {}: {}", path.display(), e);
      None
    }
  }
}

impl Draw {
  pub fn with_font(mut self, font: Option<FontVec>) -> Self {
    self.font = font;
    self
  }

  /// 在图像顶部绘制标签横幅, 返回是否写入了文字
  pub fn draw_label_on_image(&self, image: &mut RgbImage, label: &str) -> bool {
    let banner_height = (self.label_text_height as u32).min(image.height());
    if banner_height == 0 || image.width() == 0 {
      return false;
    }

    let rect = imageproc::rect::Rect::at(0, 0).of_size(image.width(), banner_height);
    draw_filled_rect_mut(image, rect, Rgb(self.label_color));

    let Some(font) = &self.font else {
      return false;
    };

    let scale = PxScale::from(self.font_size);
    let text_color = Rgb([255u8, 255u8, 255u8]); // 白色文本
    draw_text_mut(
      image,
      text_color,
      2,
      self.label_text_vertical_padding,
      scale,
      font,
      label,
    );

    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn banner_is_drawn_even_without_font() {
    let draw = Draw::default();
    let mut image = RgbImage::from_pixel(64, 64, Rgb([0, 0, 0]));

    let with_text = draw.draw_label_on_image(&mut image, "MobileNetV2Quantized: cat");
    assert!(!with_text);

    // 顶部横幅应为标签颜色
    assert_eq!(image.get_pixel(10, 5), &Rgb(LABEL_COLOR));
    // 横幅之外保持原样
    assert_eq!(image.get_pixel(10, 40), &Rgb([0, 0, 0]));
  }

  #[test]
  fn banner_height_is_clamped_to_image() {
    let draw = Draw::default();
    let mut image = RgbImage::from_pixel(8, 4, Rgb([0, 0, 0]));
    draw.draw_label_on_image(&mut image, "x");
    assert_eq!(image.get_pixel(0, 3), &Rgb(LABEL_COLOR));
  }

  #[test]
  fn missing_font_file_degrades_to_none() {
    assert!(load_font(Path::new("/no/such/font.ttf")).is_none());
  }
}
