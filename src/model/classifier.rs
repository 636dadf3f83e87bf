// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/model/classifier.rs - TFLite 量化分类器
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use thiserror::Error;
use tracing::{debug, info};
use tract_core::internal::tract_ndarray;
use tract_core::prelude::*;
use tract_tflite::Tflite;
use url::Url;

use crate::{
  FromUrl,
  frame::RgbNhwcFrame,
  model::{CIFAR10_NUM_CLASSES, ClassifyResult, InputSized, Model},
};

const CLASSIFIER_INPUT_RANK: usize = 4;
const CLASSIFIER_INPUT_CHANNELS: usize = 3;

#[derive(Error, Debug)]
pub enum ClassifierError {
  #[error("模型加载错误: {0}")]
  ModelLoadError(std::io::Error),
  #[error("模型无效: {0}")]
  ModelInvalid(String),
  #[error("推理引擎错误: {0}")]
  EngineError(TractError),
  #[error("模型路径错误: {0}")]
  ModelPathError(String),
  #[error("输入长度不匹配: 期望 {expected} 字节, 实际 {actual} 字节")]
  InputSizeMismatch { expected: usize, actual: usize },
}

impl From<std::io::Error> for ClassifierError {
  fn from(err: std::io::Error) -> Self {
    ClassifierError::ModelLoadError(err)
  }
}

impl From<TractError> for ClassifierError {
  fn from(err: TractError) -> Self {
    ClassifierError::EngineError(err)
  }
}

/// 线性扫描求最大分数的下标, 并列时取第一次出现 (最小下标)
pub fn argmax<T: PartialOrd + Copy>(scores: &[T]) -> Option<usize> {
  let mut best: Option<(usize, T)> = None;
  for (idx, &score) in scores.iter().enumerate() {
    match best {
      None => best = Some((idx, score)),
      Some((_, best_score)) if score > best_score => best = Some((idx, score)),
      _ => {}
    }
  }
  best.map(|(idx, _)| idx)
}

const TFLITE_SCHEME: &str = "tflite";

/// 输出类别数必须与固定标签表一致, 否则后续查表越界
fn validate_num_classes(num_classes: usize) -> Result<(), ClassifierError> {
  if num_classes != CIFAR10_NUM_CLASSES {
    return Err(ClassifierError::ModelInvalid(format!(
      "预期输出类别数为 {}, 实际为 {}",
      CIFAR10_NUM_CLASSES, num_classes
    )));
  }
  Ok(())
}

pub struct TfliteClassifierBuilder {
  model_path: String,
}

impl FromUrl for TfliteClassifierBuilder {
  type Error = ClassifierError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != TFLITE_SCHEME {
      return Err(ClassifierError::ModelPathError(format!(
        "模型路径必须使用 {} 方案",
        TFLITE_SCHEME
      )));
    }

    Ok(TfliteClassifierBuilder {
      model_path: url.path().to_string(),
    })
  }
}

impl TfliteClassifierBuilder {
  pub fn from_path(model_path: impl Into<String>) -> Self {
    TfliteClassifierBuilder {
      model_path: model_path.into(),
    }
  }

  /// 加载并校验模型, 构造可推理的分类器。
  ///
  /// 输入形状与类别数在此处一次性读出并固定, 之后不再变化。
  pub fn build(self) -> Result<TfliteClassifier, ClassifierError> {
    info!("加载模型文件: {}", self.model_path);
    let mut file = std::fs::File::open(&self.model_path)?;

    let engine = Tflite::default();
    let proto = engine.proto_model_for_read(&mut file)?;
    let model = engine.model_for_proto_model(&proto)?;
    debug!("模型翻译完成: {} 个节点", model.nodes().len());

    let fact = model.input_fact(0)?;
    let shape = fact
      .shape
      .as_concrete()
      .ok_or_else(|| ClassifierError::ModelInvalid("输入形状不是具体尺寸".to_string()))?;

    if shape.len() != CLASSIFIER_INPUT_RANK {
      return Err(ClassifierError::ModelInvalid(format!(
        "预期输入为 {} 维张量, 实际为 {} 维",
        CLASSIFIER_INPUT_RANK,
        shape.len()
      )));
    }

    let input_shape = [shape[0], shape[1], shape[2], shape[3]];
    if input_shape[3] != CLASSIFIER_INPUT_CHANNELS {
      return Err(ClassifierError::ModelInvalid(format!(
        "预期输入通道数为 {}, 实际为 {}",
        CLASSIFIER_INPUT_CHANNELS, input_shape[3]
      )));
    }

    // 全量化模型的输入为原始无符号字节, 其它输入类型不在支持范围内
    let input_dt = fact.datum_type;
    if input_dt.unquantized() != DatumType::U8 {
      return Err(ClassifierError::ModelInvalid(format!(
        "暂不支持的输入类型: {:?}",
        input_dt
      )));
    }

    let output_fact = model.output_fact(0)?;
    let num_classes = output_fact
      .shape
      .as_concrete()
      .map(|dims| dims.iter().product::<usize>())
      .ok_or_else(|| ClassifierError::ModelInvalid("输出形状不是具体尺寸".to_string()))?;
    validate_num_classes(num_classes)?;

    info!(
      "模型输入形状: {:?}, 输出类别数: {}",
      input_shape, num_classes
    );

    let plan = model.into_optimized()?.into_runnable()?;

    Ok(TfliteClassifier {
      plan,
      input_shape,
      input_dt,
      num_classes,
    })
  }
}

/// TFLite 量化分类器。
///
/// 持有一个已加载模型的运行时实例; 释放随所有权结束自动完成,
/// 释放后无法再发起推理。
pub struct TfliteClassifier {
  plan: TypedSimplePlan<TypedModel>,
  input_shape: [usize; 4],
  input_dt: DatumType,
  num_classes: usize,
}

impl TfliteClassifier {
  /// 输入张量形状 [batch, height, width, channels], 加载时固定
  pub fn input_shape(&self) -> [usize; 4] {
    self.input_shape
  }

  pub fn num_classes(&self) -> usize {
    self.num_classes
  }
}

impl InputSized for TfliteClassifier {
  fn input_size(&self) -> (u32, u32) {
    (self.input_shape[2] as u32, self.input_shape[1] as u32)
  }
}

impl Model for TfliteClassifier {
  type Input = RgbNhwcFrame;
  type Output = ClassifyResult;
  type Error = ClassifierError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let [_, height, width, channels] = self.input_shape;
    let expected = height * width * channels;
    if input.len() != expected {
      return Err(ClassifierError::InputSizeMismatch {
        expected,
        actual: input.len(),
      });
    }

    let array = tract_ndarray::Array4::from_shape_vec(
      (1, height, width, channels),
      input.as_nhwc().to_vec(),
    )
    .map_err(|e| ClassifierError::ModelInvalid(e.to_string()))?;

    let mut tensor: Tensor = array.into();
    if self.input_dt.is_quantized() {
      // 原始字节即量化值, 仅重新标记量化参数, 不做重标定
      tensor = tensor.cast_to_dt(self.input_dt)?.into_owned();
    }

    debug!("执行模型推理");
    let outputs = self.plan.run(tvec!(tensor.into()))?;

    debug!("获取模型输出");
    let scores = outputs[0].cast_to::<f32>()?;
    let scores = scores.as_slice::<f32>()?;

    let class_id = argmax(scores)
      .ok_or_else(|| ClassifierError::ModelInvalid("模型输出为空".to_string()))?;

    Ok(ClassifyResult {
      class_id: class_id as u32,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn argmax_returns_index_of_unique_maximum() {
    let scores: [i8; 10] = [-128, -5, 0, 3, 100, 7, -1, 99, 2, -60];
    assert_eq!(argmax(&scores), Some(4));
  }

  #[test]
  fn argmax_breaks_ties_by_first_occurrence() {
    let mut scores = [-128i8; 10];
    scores[2] = 100;
    scores[7] = 100;
    assert_eq!(argmax(&scores), Some(2));

    let all_equal = [5i8; 10];
    assert_eq!(argmax(&all_equal), Some(0));
  }

  #[test]
  fn argmax_index_is_always_in_range() {
    let scores: [i8; 10] = [1, -2, 3, -4, 5, -6, 7, -8, 9, -10];
    let idx = argmax(&scores).unwrap();
    assert!(idx < scores.len());
  }

  #[test]
  fn argmax_of_empty_slice_is_none() {
    let scores: [i8; 0] = [];
    assert_eq!(argmax(&scores), None);
  }

  #[test]
  fn class_count_matching_label_table_is_accepted() {
    assert!(validate_num_classes(CIFAR10_NUM_CLASSES).is_ok());
  }

  #[test]
  fn wider_class_count_is_rejected_at_load() {
    // 超出标签表的类别下标会在查表时触发前置条件违例,
    // 因此类别数不符的模型必须在加载阶段拒绝
    let result = validate_num_classes(12);
    assert!(matches!(result, Err(ClassifierError::ModelInvalid(_))));

    let result = validate_num_classes(2);
    assert!(matches!(result, Err(ClassifierError::ModelInvalid(_))));
  }

  #[test]
  fn garbage_bytes_are_not_a_valid_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.tflite");
    std::fs::write(&path, [0u8; 64]).unwrap();

    let result = TfliteClassifierBuilder::from_path(path.display().to_string()).build();
    assert!(result.is_err());
  }

  #[test]
  fn missing_file_is_a_load_error() {
    let result = TfliteClassifierBuilder::from_path("/no/such/model.tflite").build();
    assert!(matches!(result, Err(ClassifierError::ModelLoadError(_))));
  }

  #[test]
  fn builder_rejects_wrong_url_scheme() {
    let url = Url::parse("image:///tmp/model.tflite").unwrap();
    let result = TfliteClassifierBuilder::from_url(&url);
    assert!(matches!(result, Err(ClassifierError::ModelPathError(_))));
  }
}
