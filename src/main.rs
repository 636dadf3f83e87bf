// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use luming::{
  FromUrl,
  input::GalleryInput,
  model::{Cifar10Label, TfliteClassifierBuilder, resolve_model_path},
  output::DirectoryRecordOutput,
  task::{ClassifyTask, Task},
};

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  info!("模型: {}", args.model);
  info!("资源目录: {}", args.assets.display());
  info!("输入图片数: {}", args.inputs.len());
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

  let input = GalleryInput::new(args.inputs);
  let output = DirectoryRecordOutput::from_url(&args.output)?;

  ClassifyTask::<Cifar10Label>::new(args.model).run_task(input, classifier, output)?;

  Ok(())
}
