// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/args.rs - 项目参数配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use clap::Parser;
use url::Url;

/// Luming 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 模型名称 (MobileNetV2Quantized / ResNet50Quantized) 或 tflite 模型文件路径
  #[arg(long, default_value = "MobileNetV2Quantized", value_name = "MODEL")]
  pub model: String,

  /// 内置模型所在的资源目录
  #[arg(long, default_value = "assets", value_name = "DIR")]
  pub assets: PathBuf,

  /// 输入图片文件, 可多选 (解码失败的图片整批跳过)
  #[arg(long = "input", value_name = "FILE", required = true, num_args = 1..)]
  pub inputs: Vec<PathBuf>,

  /// 输出 URL
  /// 支持格式:
  /// - 会话目录: folder:///path/to/dir (可加 ?font=/path/font.ttf)
  #[arg(long, default_value = "folder:///tmp/luming", value_name = "OUTPUT")]
  pub output: Url,
}
