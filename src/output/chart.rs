// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/output/chart.rs - 基准测试折线图输出
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
  draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  output::{Render, draw::load_font, save_image_file::write_image},
  record::{BenchmarkReport, BenchmarkSeries},
};

const CHART_WIDTH: u32 = 960;
const CHART_HEIGHT: u32 = 600;
const MARGIN_LEFT: u32 = 80;
const MARGIN_RIGHT: u32 = 40;
const MARGIN_TOP: u32 = 60;
const MARGIN_BOTTOM: u32 = 70;
const POINT_RADIUS: i32 = 3;
const LEGEND_SWATCH: u32 = 14;
const AXIS_FONT_SIZE: f32 = 18.0;

// 两条序列的颜色: 黑色与紫色
const SERIES_COLORS: [[u8; 3]; 2] = [[0, 0, 0], [187, 134, 252]];
const BACKGROUND: [u8; 3] = [255, 255, 255];
const AXIS_COLOR: [u8; 3] = [60, 60, 60];

const X_AXIS_TITLE: &str = "Image Index";
const Y_AXIS_TITLE: &str = "Inference Time (ms)";

#[derive(Error, Debug)]
pub enum ChartOutputError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

/// 把两条基准测试序列画成带图例与坐标轴标题的折线图
pub struct LineChart {
  width: u32,
  height: u32,
  font: Option<FontVec>,
}

impl Default for LineChart {
  fn default() -> Self {
    LineChart {
      width: CHART_WIDTH,
      height: CHART_HEIGHT,
      font: None,
    }
  }
}

impl LineChart {
  pub fn with_font(mut self, font: Option<FontVec>) -> Self {
    self.font = font;
    self
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  fn plot_x(&self, index: usize, max_index: usize) -> f32 {
    let span = (self.width - MARGIN_LEFT - MARGIN_RIGHT) as f32;
    MARGIN_LEFT as f32 + span * (index as f32) / (max_index.max(1) as f32)
  }

  fn plot_y(&self, elapsed_ms: u64, max_ms: u64) -> f32 {
    let span = (self.height - MARGIN_TOP - MARGIN_BOTTOM) as f32;
    (self.height - MARGIN_BOTTOM) as f32 - span * (elapsed_ms as f32) / (max_ms.max(1) as f32)
  }

  fn draw_text(&self, image: &mut RgbImage, x: i32, y: i32, text: &str) {
    if let Some(font) = &self.font {
      draw_text_mut(
        image,
        Rgb(AXIS_COLOR),
        x,
        y,
        PxScale::from(AXIS_FONT_SIZE),
        font,
        text,
      );
    }
  }

  fn draw_series(
    &self,
    image: &mut RgbImage,
    series: &BenchmarkSeries,
    color: [u8; 3],
    max_index: usize,
    max_ms: u64,
  ) {
    let points: Vec<(f32, f32)> = series
      .points
      .iter()
      .map(|p| (self.plot_x(p.image_index, max_index), self.plot_y(p.elapsed_ms, max_ms)))
      .collect();

    for pair in points.windows(2) {
      draw_line_segment_mut(image, pair[0], pair[1], Rgb(color));
    }
    for &(x, y) in &points {
      draw_filled_circle_mut(image, (x as i32, y as i32), POINT_RADIUS, Rgb(color));
    }
  }

  /// 渲染整张图表
  pub fn render(&self, report: &BenchmarkReport) -> RgbImage {
    let mut image = RgbImage::from_pixel(self.width, self.height, Rgb(BACKGROUND));

    let max_index = report.max_image_index();
    let max_ms = report.max_elapsed_ms();

    // 坐标轴
    let origin = (
      MARGIN_LEFT as f32,
      (self.height - MARGIN_BOTTOM) as f32,
    );
    draw_line_segment_mut(
      &mut image,
      origin,
      ((self.width - MARGIN_RIGHT) as f32, origin.1),
      Rgb(AXIS_COLOR),
    );
    draw_line_segment_mut(
      &mut image,
      origin,
      (origin.0, MARGIN_TOP as f32),
      Rgb(AXIS_COLOR),
    );

    // 序列
    for (series, color) in report.series.iter().zip(SERIES_COLORS) {
      self.draw_series(&mut image, series, color, max_index, max_ms);
    }

    // 图例 (顶部, 与序列颜色一一对应)
    let mut legend_x = MARGIN_LEFT as i32;
    let legend_y = (MARGIN_TOP / 2) as i32;
    for (series, color) in report.series.iter().zip(SERIES_COLORS) {
      let rect =
        imageproc::rect::Rect::at(legend_x, legend_y).of_size(LEGEND_SWATCH, LEGEND_SWATCH);
      draw_filled_rect_mut(&mut image, rect, Rgb(color));
      self.draw_text(
        &mut image,
        legend_x + LEGEND_SWATCH as i32 + 6,
        legend_y - 2,
        &series.model,
      );
      legend_x += LEGEND_SWATCH as i32 + 6 + (series.model.len() as i32) * 10 + 24;
    }

    // 坐标轴标题与量程
    self.draw_text(
      &mut image,
      (self.width / 2) as i32 - 50,
      (self.height - MARGIN_BOTTOM / 2) as i32,
      X_AXIS_TITLE,
    );
    self.draw_text(
      &mut image,
      8,
      MARGIN_TOP as i32 - 24,
      Y_AXIS_TITLE,
    );
    self.draw_text(
      &mut image,
      MARGIN_LEFT as i32 - 4,
      (self.height - MARGIN_BOTTOM) as i32 + 8,
      "0",
    );
    self.draw_text(
      &mut image,
      (self.width - MARGIN_RIGHT) as i32 - 16,
      (self.height - MARGIN_BOTTOM) as i32 + 8,
      &max_index.to_string(),
    );
    self.draw_text(
      &mut image,
      (MARGIN_LEFT as i32 - 48).max(0),
      MARGIN_TOP as i32 - 8,
      &max_ms.to_string(),
    );

    image
  }
}

/// 图表输出: 渲染折线图保存为 PNG, 可选同时输出序列 JSON
pub struct ChartOutput {
  path: PathBuf,
  chart: LineChart,
  record: bool,
}

impl FromUrlWithScheme for ChartOutput {
  const SCHEME: &'static str = "chart";
}

impl FromUrl for ChartOutput {
  type Error = ChartOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ChartOutputError::SchemeMismatch(format!(
        "期望输出方式 '{}', 实际输出方式 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    let font = url
      .query_pairs()
      .find(|(k, _)| k == "font")
      .and_then(|(_, v)| load_font(std::path::Path::new(v.as_ref())));

    let record = url.query_pairs().any(|(k, _)| k == "record");

    Ok(ChartOutput {
      path: PathBuf::from(url.path()),
      chart: LineChart::default().with_font(font),
      record,
    })
  }
}

impl ChartOutput {
  pub fn with_record(mut self, record: bool) -> Self {
    self.record = record;
    self
  }
}

impl Render<BenchmarkReport> for ChartOutput {
  type Error = ChartOutputError;

  fn render_result(&self, result: &BenchmarkReport) -> Result<(), Self::Error> {
    let image = self.chart.render(result);
    write_image(&self.path, &image)?;
    warn!("保存图表到文件: {}", self.path.display());

    if self.record {
      let json_path = self.path.with_extension("json");
      std::fs::write(&json_path, serde_json::to_string_pretty(result)?)?;
      warn!("保存序列记录到文件: {}", json_path.display());
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_report() -> BenchmarkReport {
    let mut a = BenchmarkSeries::new("MobileNetV2Quantized");
    let mut b = BenchmarkSeries::new("ResNet50Quantized");
    for i in 0..5usize {
      a.push(i, 5 + i as u64);
      b.push(i, 40 + i as u64);
    }
    BenchmarkReport { series: [a, b] }
  }

  #[test]
  fn chart_has_configured_dimensions() {
    let image = LineChart::default().render(&sample_report());
    assert_eq!(image.width(), CHART_WIDTH);
    assert_eq!(image.height(), CHART_HEIGHT);
  }

  #[test]
  fn chart_of_empty_report_still_draws_axes() {
    let report = BenchmarkReport {
      series: [BenchmarkSeries::new("a"), BenchmarkSeries::new("b")],
    };
    let image = LineChart::default().render(&report);

    // 横轴应已绘制
    let y = CHART_HEIGHT - MARGIN_BOTTOM;
    assert_eq!(image.get_pixel(CHART_WIDTH / 2, y), &Rgb(AXIS_COLOR));
  }

  #[test]
  fn points_land_inside_plot_area() {
    let chart = LineChart::default();
    let report = sample_report();
    let max_index = report.max_image_index();
    let max_ms = report.max_elapsed_ms();

    for series in &report.series {
      for p in &series.points {
        let x = chart.plot_x(p.image_index, max_index);
        let y = chart.plot_y(p.elapsed_ms, max_ms);
        assert!(x >= MARGIN_LEFT as f32 && x <= (CHART_WIDTH - MARGIN_RIGHT) as f32);
        assert!(y >= MARGIN_TOP as f32 && y <= (CHART_HEIGHT - MARGIN_BOTTOM) as f32);
      }
    }
  }

  #[test]
  fn chart_output_writes_png_and_optional_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench").join("chart.png");
    let url = Url::parse(&format!("chart://{}?record", path.display())).unwrap();

    let output = ChartOutput::from_url(&url).unwrap();
    output.render_result(&sample_report()).unwrap();

    assert!(path.exists());
    assert!(path.with_extension("json").exists());

    let json: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(path.with_extension("json")).unwrap())
        .unwrap();
    assert_eq!(json["series"][0]["points"][0]["image_index"], 0);
  }

  #[test]
  fn chart_output_rejects_wrong_scheme() {
    let url = Url::parse("image:///tmp/chart.png").unwrap();
    assert!(matches!(
      ChartOutput::from_url(&url),
      Err(ChartOutputError::SchemeMismatch(_))
    ));
  }
}
