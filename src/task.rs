// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/task.rs - 分类与基准测试任务
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

use std::time::Instant;

use chrono::Utc;
use tracing::info;

use crate::{
  frame::RgbNhwcFrame,
  input::SourceImage,
  model::{ClassifyResult, InputSized, Model, WithLabel},
  output::Render,
  record::{BenchmarkReport, BenchmarkSeries, ClassifiedImage, ClassifiedRecord},
};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<(), Self::Error>;
}

/// 分类任务: 逐张图片预处理、推理、记录并渲染。
///
/// 推理在调用线程上同步阻塞执行, 一次只有一个活动计算;
/// 仅推理本身计入耗时, 解码与预处理不计。
pub struct ClassifyTask<L> {
  model_name: String,
  _phantom: std::marker::PhantomData<L>,
}

impl<L> ClassifyTask<L> {
  pub fn new(model_name: impl Into<String>) -> Self {
    ClassifyTask {
      model_name: model_name.into(),
      _phantom: std::marker::PhantomData,
    }
  }
}

impl<
  L: WithLabel,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  SE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = SourceImage>,
  M: Model<Input = RgbNhwcFrame, Output = ClassifyResult, Error = ME> + InputSized,
  O: Render<ClassifiedImage, Error = RE> + Render<Vec<ClassifiedRecord>, Error = SE>,
> Task<I, M, O> for ClassifyTask<L>
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, model: M, output: O) -> Result<(), Self::Error> {
    info!("开始分类任务...");
    let (width, height) = model.input_size();

    // 本次会话的记录列表, 只追加不修改
    let mut session: Vec<ClassifiedRecord> = Vec::new();

    for source in input {
      let frame = RgbNhwcFrame::from_image(&source.image, width, height);

      let now = Instant::now();
      let result = model.infer(&frame)?;
      let elapsed = now.elapsed();

      let label = L::from_label_id(result.class_id).to_label_str();
      info!(
        "图片 {} 分类完成: {} (耗时 {:.2?})",
        source.source, label, elapsed
      );

      let record = ClassifiedRecord {
        source: source.source,
        model: self.model_name.clone(),
        label,
        class_id: result.class_id,
        elapsed_ms: elapsed.as_millis() as u64,
        timestamp: Utc::now(),
      };
      let classified = ClassifiedImage {
        image: source.image,
        record,
      };

      <O as Render<ClassifiedImage>>::render_result(&output, &classified)?;
      session.push(classified.record);
    }

    if session.is_empty() {
      return Err(anyhow::anyhow!("没有可分类的输入帧"));
    }

    <O as Render<Vec<ClassifiedRecord>>>::render_result(&output, &session)?;
    info!("分类任务完成, 共 {} 条记录", session.len());

    Ok(())
  }
}

/// 基准测试任务: 两个模型跑同一批图片, 记录逐张推理耗时。
///
/// 每张图片只解码一次, 再按两个模型各自的输入尺寸分别预处理;
/// 计时覆盖预处理与推理, 不含解码。推理错误对整个运行是终止性的。
pub struct BenchmarkTask {
  model_names: (String, String),
}

impl BenchmarkTask {
  pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
    BenchmarkTask {
      model_names: (first.into(), second.into()),
    }
  }
}

impl<
  MAE: std::error::Error + Sync + Send + 'static,
  MBE: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = SourceImage>,
  MA: Model<Input = RgbNhwcFrame, Output = ClassifyResult, Error = MAE> + InputSized,
  MB: Model<Input = RgbNhwcFrame, Output = ClassifyResult, Error = MBE> + InputSized,
  O: Render<BenchmarkReport, Error = RE>,
> Task<I, (MA, MB), O> for BenchmarkTask
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, (model_a, model_b): (MA, MB), output: O) -> Result<(), Self::Error> {
    info!("开始基准测试任务...");
    let (width_a, height_a) = model_a.input_size();
    let (width_b, height_b) = model_b.input_size();

    let mut series_a = BenchmarkSeries::new(self.model_names.0);
    let mut series_b = BenchmarkSeries::new(self.model_names.1);

    for source in input {
      let now = Instant::now();
      let frame = RgbNhwcFrame::from_image(&source.image, width_a, height_a);
      model_a.infer(&frame)?;
      let elapsed_a = now.elapsed();

      let now = Instant::now();
      let frame = RgbNhwcFrame::from_image(&source.image, width_b, height_b);
      model_b.infer(&frame)?;
      let elapsed_b = now.elapsed();

      info!(
        "图片 {} ({}): {} 耗时 {:.2?}, {} 耗时 {:.2?}",
        source.index, source.source, series_a.model, elapsed_a, series_b.model, elapsed_b
      );

      series_a.push(source.index, elapsed_a.as_millis() as u64);
      series_b.push(source.index, elapsed_b.as_millis() as u64);
    }

    info!(
      "基准测试完成, 成功分类 {} 张图片",
      series_a.len()
    );

    let report = BenchmarkReport {
      series: [series_a, series_b],
    };
    output.render_result(&report)?;

    Ok(())
  }
}
