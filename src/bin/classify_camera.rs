// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/bin/classify_camera.rs - 摄像头单发分类
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
  input::CameraInput,
  model::{Cifar10Label, TfliteClassifierBuilder, resolve_model_path},
  output::SaveImageFileOutput,
  task::{ClassifyTask, Task},
};

/// Luming 摄像头分类参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 模型名称 (MobileNetV2Quantized / ResNet50Quantized) 或 tflite 模型文件路径
  #[arg(long, default_value = "MobileNetV2Quantized", value_name = "MODEL")]
  pub model: String,

  /// 内置模型所在的资源目录
  #[arg(long, default_value = "assets", value_name = "DIR")]
  pub assets: PathBuf,

  /// 摄像头设备 URL, 形如 v4l:///dev/video0
  #[arg(long, default_value = "v4l:///dev/video0", value_name = "SOURCE")]
  pub input: Url,

  /// 输出 URL, 形如 image:///path/to/out.png (可加 ?font=/path/font.ttf)
  #[arg(long, default_value = "image:///tmp/luming-camera.png", value_name = "OUTPUT")]
  pub output: Url,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("模型: {}", args.model);
  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);

  let model_path = resolve_model_path(&args.assets, &args.model);
  let classifier = TfliteClassifierBuilder::from_path(model_path.display().to_string())
    .build()
    .with_context(|| format!("无法加载模型: {}", args.model))?;
  info!(
    "模型输入形状: {:?}, 类别数: {}",
    classifier.input_shape(),
    classifier.num_classes()
  );

  let input = CameraInput::from_url(&args.input)?;
  let output = SaveImageFileOutput::from_url(&args.output)?;

  ClassifyTask::<Cifar10Label>::new(args.model).run_task(input, classifier, output)?;

  Ok(())
}
