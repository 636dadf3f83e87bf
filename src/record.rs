// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/record.rs - 分类记录与基准测试序列
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

use chrono::{DateTime, Utc};
use image::RgbImage;
use serde::Serialize;

/// 一次分类的结果记录, 创建之后不再修改
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedRecord {
  /// 输入来源 (文件或设备路径)
  pub source: String,
  /// 模型名称
  pub model: String,
  /// 预测类别名称
  pub label: String,
  /// 预测类别下标
  pub class_id: u32,
  /// 推理耗时 (毫秒)
  pub elapsed_ms: u64,
  /// 记录创建时间
  pub timestamp: DateTime<Utc>,
}

impl ClassifiedRecord {
  /// 展示标签: "模型名: 类别名"
  pub fn display_label(&self) -> String {
    format!("{}: {}", self.model, self.label)
  }
}

/// 分类结果与其原始图像
pub struct ClassifiedImage {
  pub image: RgbImage,
  pub record: ClassifiedRecord,
}

/// 基准测试序列中的一个点: (输入序号, 推理毫秒数)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BenchmarkPoint {
  pub image_index: usize,
  pub elapsed_ms: u64,
}

/// 单个模型在一次基准测试中的时间序列, 顺序与输入顺序一致
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkSeries {
  pub model: String,
  pub points: Vec<BenchmarkPoint>,
}

impl BenchmarkSeries {
  pub fn new(model: impl Into<String>) -> Self {
    BenchmarkSeries {
      model: model.into(),
      points: Vec::new(),
    }
  }

  pub fn push(&mut self, image_index: usize, elapsed_ms: u64) {
    self.points.push(BenchmarkPoint {
      image_index,
      elapsed_ms,
    });
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }
}

/// 一次基准测试的完整结果: 两个模型各一条序列, 每次运行整体替换
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
  pub series: [BenchmarkSeries; 2],
}

impl BenchmarkReport {
  /// 所有序列中最大的输入序号, 用于横轴标定
  pub fn max_image_index(&self) -> usize {
    self
      .series
      .iter()
      .flat_map(|s| s.points.iter().map(|p| p.image_index))
      .max()
      .unwrap_or(0)
  }

  /// 所有序列中最大的耗时, 用于纵轴标定
  pub fn max_elapsed_ms(&self) -> u64 {
    self
      .series
      .iter()
      .flat_map(|s| s.points.iter().map(|p| p.elapsed_ms))
      .max()
      .unwrap_or(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_label_joins_model_and_class() {
    let record = ClassifiedRecord {
      source: "cat.png".to_string(),
      model: "MobileNetV2Quantized".to_string(),
      label: "cat".to_string(),
      class_id: 3,
      elapsed_ms: 12,
      timestamp: Utc::now(),
    };
    assert_eq!(record.display_label(), "MobileNetV2Quantized: cat");
  }

  #[test]
  fn report_axis_bounds_cover_both_series() {
    let mut a = BenchmarkSeries::new("a");
    a.push(0, 5);
    a.push(3, 9);
    let mut b = BenchmarkSeries::new("b");
    b.push(0, 40);
    b.push(3, 1);

    let report = BenchmarkReport { series: [a, b] };
    assert_eq!(report.max_image_index(), 3);
    assert_eq!(report.max_elapsed_ms(), 40);
  }

  #[test]
  fn series_serializes_with_input_indices() {
    let mut series = BenchmarkSeries::new("MobileNetV2Quantized");
    series.push(0, 7);
    series.push(2, 8);

    let json = serde_json::to_value(&series).unwrap();
    assert_eq!(json["model"], "MobileNetV2Quantized");
    assert_eq!(json["points"][1]["image_index"], 2);
    assert_eq!(json["points"][1]["elapsed_ms"], 8);
  }
}
