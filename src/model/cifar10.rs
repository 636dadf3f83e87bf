// 该文件是 Luming （鹿鸣） 项目的一部分。
// src/model/cifar10.rs - CIFAR-10 类别标签
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use crate::model::WithLabel;

/// CIFAR-10 数据集共 10 个类别
pub const CIFAR10_NUM_CLASSES: usize = 10;

/// CIFAR-10 类别标签, 变体顺序即模型输出下标 0-9
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cifar10Label {
  Airplane,
  Automobile,
  Bird,
  Cat,
  Deer,
  Dog,
  Frog,
  Horse,
  Ship,
  Truck,
}

impl WithLabel for Cifar10Label {
  fn to_label_str(&self) -> String {
    let name = match self {
      Cifar10Label::Airplane => "airplane",
      Cifar10Label::Automobile => "automobile",
      Cifar10Label::Bird => "bird",
      Cifar10Label::Cat => "cat",
      Cifar10Label::Deer => "deer",
      Cifar10Label::Dog => "dog",
      Cifar10Label::Frog => "frog",
      Cifar10Label::Horse => "horse",
      Cifar10Label::Ship => "ship",
      Cifar10Label::Truck => "truck",
    };
    name.to_string()
  }

  fn to_label_id(&self) -> u32 {
    *self as u32
  }

  fn from_label_id(id: u32) -> Self {
    match id {
      0 => Cifar10Label::Airplane,
      1 => Cifar10Label::Automobile,
      2 => Cifar10Label::Bird,
      3 => Cifar10Label::Cat,
      4 => Cifar10Label::Deer,
      5 => Cifar10Label::Dog,
      6 => Cifar10Label::Frog,
      7 => Cifar10Label::Horse,
      8 => Cifar10Label::Ship,
      9 => Cifar10Label::Truck,
      _ => panic!("无效的类别编号: {id}"),
    }
  }
}
