// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/frame.rs - NHWC 帧定义与预处理
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

use image::RgbImage;

const RGB_CHANNELS: usize = 3;

/// NHWC 格式的 RGB 帧。
///
/// 数据为行主序的原始字节强度，通道顺序 R、G、B，无填充、无归一化，
/// 长度恒等于 `height × width × 3`。量化模型直接以该字节序列为输入。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbNhwcFrame {
  data: Box<[u8]>,
  width: usize,
  height: usize,
}

impl RgbNhwcFrame {
  /// 从已解码的图像生成目标尺寸的帧。
  ///
  /// 使用三角滤波缩放到 `width × height`（非正方形的来源会被拉伸，
  /// 不保持纵横比），再按行主序写出 R、G、B 三个字节。
  /// 调用方保证目标尺寸不小于 1。
  pub fn from_image(image: &RgbImage, width: u32, height: u32) -> Self {
    let resized =
      image::imageops::resize(image, width, height, image::imageops::FilterType::Triangle);

    // RgbImage 的内部布局即 NHWC, 直接取原始字节
    Self {
      data: resized.into_raw().into_boxed_slice(),
      width: width as usize,
      height: height as usize,
    }
  }

  /// 从现成的 NHWC 字节序列构造帧, 长度不符视为调用方违反前置条件
  pub fn from_data(height: usize, width: usize, data: Vec<u8>) -> Self {
    if data.len() != RGB_CHANNELS * height * width {
      panic!(
        "数据长度不匹配: 期望长度 {}, 实际长度 {}",
        RGB_CHANNELS * height * width,
        data.len()
      );
    }

    Self {
      data: data.into_boxed_slice(),
      width,
      height,
    }
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn as_nhwc(&self) -> &[u8] {
    &self.data
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  #[test]
  fn buffer_length_is_always_s_squared_times_three() {
    let source = RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]));
    for s in [1u32, 2, 3, 16, 32, 224] {
      let frame = RgbNhwcFrame::from_image(&source, s, s);
      assert_eq!(frame.len(), (s * s * 3) as usize);
      assert_eq!(frame.width(), s as usize);
      assert_eq!(frame.height(), s as usize);
    }
  }

  #[test]
  fn non_square_source_is_stretched_to_target() {
    // 非正方形来源拉伸到正方形, 不裁剪
    let mut source = RgbImage::from_pixel(100, 10, Rgb([0, 0, 0]));
    for y in 0..10 {
      for x in 0..50 {
        source.put_pixel(x, y, Rgb([255, 255, 255]));
      }
    }

    let frame = RgbNhwcFrame::from_image(&source, 32, 32);
    assert_eq!(frame.len(), 32 * 32 * 3);

    // 左半仍亮、右半仍暗, 说明整幅图都被保留
    let data = frame.as_nhwc();
    let left = data[(16 * 32 + 2) * 3] as u32;
    let right = data[(16 * 32 + 29) * 3] as u32;
    assert!(left > 200, "左半应接近白色, 实际 {left}");
    assert!(right < 50, "右半应接近黑色, 实际 {right}");
  }

  #[test]
  fn channel_order_is_r_g_b() {
    let source = RgbImage::from_pixel(64, 64, Rgb([200, 100, 50]));
    let frame = RgbNhwcFrame::from_image(&source, 32, 32);

    for pixel in frame.as_nhwc().chunks_exact(3) {
      assert_eq!(pixel, &[200, 100, 50]);
    }
  }

  #[test]
  fn identity_resize_keeps_raw_bytes() {
    let mut source = RgbImage::new(2, 2);
    source.put_pixel(0, 0, Rgb([1, 2, 3]));
    source.put_pixel(1, 0, Rgb([4, 5, 6]));
    source.put_pixel(0, 1, Rgb([7, 8, 9]));
    source.put_pixel(1, 1, Rgb([10, 11, 12]));

    let frame = RgbNhwcFrame::from_image(&source, 2, 2);
    assert_eq!(frame.as_nhwc(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
  }

  #[test]
  #[should_panic(expected = "数据长度不匹配")]
  fn from_data_rejects_wrong_length() {
    let _ = RgbNhwcFrame::from_data(2, 2, vec![0u8; 11]);
  }
}
