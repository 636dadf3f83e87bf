// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/bin/benchmark_pair.rs - 双模型推理耗时基准测试
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

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use url::Url;

use luming::{
  FromUrl,
  input::GalleryInput,
  model::{
    MOBILENET_V2_QUANTIZED, RESNET50_QUANTIZED, TfliteClassifierBuilder, resolve_model_path,
  },
  output::ChartOutput,
  task::{BenchmarkTask, Task},
};

/// Luming 基准测试参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 内置模型所在的资源目录
  #[arg(long, default_value = "assets", value_name = "DIR")]
  pub assets: PathBuf,

  /// 输入图片文件, 可多选 (解码失败的图片整批跳过)
  #[arg(long = "input", value_name = "FILE", required = true, num_args = 1..)]
  pub inputs: Vec<PathBuf>,

  /// 图表输出 URL, 形如 chart:///path/to/chart.png (可加 ?font=/path/font.ttf)
  #[arg(long, default_value = "chart:///tmp/luming-benchmark.png", value_name = "OUTPUT")]
  pub output: Url,

  /// 同时把两条序列输出为图表旁的 JSON 文件
  #[arg(long)]
  pub record: bool,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("资源目录: {}", args.assets.display());
  info!("输入图片数: {}", args.inputs.len());
  info!("输出路径: {}", args.output);

  let mobilenet = TfliteClassifierBuilder::from_path(
    resolve_model_path(&args.assets, MOBILENET_V2_QUANTIZED)
      .display()
      .to_string(),
  )
  .build()
  .with_context(|| format!("无法加载模型: {}", MOBILENET_V2_QUANTIZED))?;

  let resnet = TfliteClassifierBuilder::from_path(
    resolve_model_path(&args.assets, RESNET50_QUANTIZED)
      .display()
      .to_string(),
  )
  .build()
  .with_context(|| format!("无法加载模型: {}", RESNET50_QUANTIZED))?;

  info!(
    "模型输入形状: {} {:?}, {} {:?}, 类别数: {}",
    MOBILENET_V2_QUANTIZED,
    mobilenet.input_shape(),
    RESNET50_QUANTIZED,
    resnet.input_shape(),
    mobilenet.num_classes()
  );

  let input = GalleryInput::new(args.inputs);
  let output = ChartOutput::from_url(&args.output)?.with_record(args.record);

  BenchmarkTask::new(MOBILENET_V2_QUANTIZED, RESNET50_QUANTIZED)
    .run_task(input, (mobilenet, resnet), output)?;

  Ok(())
}
