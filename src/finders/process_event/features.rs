// Sat Oct 17 2026 - Alex

use crate::analysis::adrl::resolve_in_stream;
use crate::analysis::arm64::Instruction;
use crate::memory::Address;
use crate::runtime::offsets::UeOffsets;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Feature {
    ObjectArray = 0,
    InternalIndex = 1,
    ItemSize = 2,
    FunctionFlags1 = 3,
    PropertiesSize = 4,
    ParamSize = 5,
    ParamSizeReused = 6,
    Children = 7,
    FunctionFlags2 = 8,
    ChildrenReused = 9,
}

impl Feature {
    pub const COUNT: usize = 10;

    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::ObjectArray,
        Feature::InternalIndex,
        Feature::ItemSize,
        Feature::FunctionFlags1,
        Feature::PropertiesSize,
        Feature::ParamSize,
        Feature::ParamSizeReused,
        Feature::Children,
        Feature::FunctionFlags2,
        Feature::ChildrenReused,
    ];

    pub fn bit(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureVector {
    bits: [bool; Feature::COUNT],
}

impl FeatureVector {
    pub fn full() -> Self {
        Self {
            bits: [true; Feature::COUNT],
        }
    }

    pub fn set(&mut self, feature: Feature) {
        self.bits[feature.bit()] = true;
    }

    pub fn has(&self, feature: Feature) -> bool {
        self.bits[feature.bit()]
    }

    pub fn score(&self) -> u32 {
        self.bits.iter().filter(|&&b| b).count() as u32
    }

    pub fn as_bits(&self) -> u16 {
        self.bits
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, &b)| if b { acc | (1 << i) } else { acc })
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter().rev() {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSignals {
    pub object_array: Address,
    pub obj_objects: Address,
    pub internal_index: u64,
    pub item_size: u64,
    pub function_flags: u64,
    pub properties_size: u64,
    pub param_size: u64,
    pub children: u64,
}

impl FeatureSignals {
    pub fn new(offsets: &UeOffsets, object_array: Address, obj_objects: Address) -> Self {
        Self {
            object_array,
            obj_objects,
            internal_index: offsets.uobject.internal_index,
            item_size: offsets.fuobject_item.size,
            function_flags: offsets.ufunction.function_flags,
            properties_size: offsets.ustruct.properties_size,
            param_size: offsets.ufunction.param_size,
            children: offsets.ustruct.children_field(),
        }
    }

    fn is_object_array(&self, addr: Address) -> bool {
        !addr.is_null() && (addr == self.object_array || addr == self.obj_objects)
    }
}

fn matches(immediate: i64, offset: u64) -> bool {
    offset != 0 && immediate == offset as i64
}

/// Scores a decoded instruction stream.
///
/// `deref` reads a pointer at an address; it is how an address compute
/// that lands on a global holding the object array gets recognized.
/// The reuse features need a second instruction with the same immediate.
/// One instruction never sets both a base bit and its reuse bit, so a
/// single `ParamSize` or `Children` access contributes one point, not two.
pub fn score_instructions<F>(instructions: &[Instruction], signals: &FeatureSignals, deref: F) -> FeatureVector
where
    F: Fn(Address) -> Address,
{
    let mut vector = FeatureVector::default();

    for (index, insn) in instructions.iter().enumerate() {
        if !insn.is_valid() {
            continue;
        }

        if !vector.has(Feature::ObjectArray) && insn.is_address_compute() {
            let target = resolve_in_stream(instructions, index).unwrap_or(insn.target);
            if signals.is_object_array(target) || signals.is_object_array(deref(target)) {
                vector.set(Feature::ObjectArray);
            }
        }

        let imm = insn.immediate;

        if matches(imm, signals.internal_index) {
            vector.set(Feature::InternalIndex);
        }
        if matches(imm, signals.item_size) {
            vector.set(Feature::ItemSize);
        }
        if signals.function_flags != 0 && matches(imm, signals.function_flags + 1) {
            vector.set(Feature::FunctionFlags1);
        }
        if matches(imm, signals.properties_size) {
            vector.set(Feature::PropertiesSize);
        }
        if matches(imm, signals.param_size) {
            if vector.has(Feature::ParamSize) {
                vector.set(Feature::ParamSizeReused);
            }
            vector.set(Feature::ParamSize);
        }
        if matches(imm, signals.children) {
            if vector.has(Feature::Children) {
                vector.set(Feature::ChildrenReused);
            }
            vector.set(Feature::Children);
        }
        if signals.function_flags != 0 && matches(imm, signals.function_flags + 2) {
            vector.set(Feature::FunctionFlags2);
        }
    }

    vector
}
