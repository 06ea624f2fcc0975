// Fri Oct 16 2026 - Alex

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FNameEntryOffsets {
    pub index: u64,
    pub name: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FNamePoolOffsets {
    pub blocks_bit: u32,
    pub blocks_off: u64,
    pub stride: u64,
}

impl Default for FNamePoolOffsets {
    fn default() -> Self {
        Self {
            blocks_bit: 16,
            blocks_off: 0x10,
            stride: 2,
        }
    }
}

impl FNamePoolOffsets {
    pub fn block_index(&self, id: i32) -> u64 {
        (id as u32).checked_shr(self.blocks_bit).unwrap_or(0) as u64
    }

    pub fn offset_in_block(&self, id: i32) -> u64 {
        let mask = 1u32.checked_shl(self.blocks_bit).map_or(u32::MAX, |v| v - 1);
        (id as u32 & mask) as u64 * self.stride
    }
}

/// Pool entry header layout. The header is a packed u16 holding the
/// string length and a wide-character flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FNamePoolEntryOffsets {
    pub header: u64,
    #[serde(default = "default_len_shift")]
    pub len_shift: u32,
    #[serde(default = "default_len_bits")]
    pub len_bits: u32,
    #[serde(default)]
    pub wide_bit: u32,
}

fn default_len_shift() -> u32 {
    6
}

fn default_len_bits() -> u32 {
    10
}

impl Default for FNamePoolEntryOffsets {
    fn default() -> Self {
        Self {
            header: 0,
            len_shift: default_len_shift(),
            len_bits: default_len_bits(),
            wide_bit: 0,
        }
    }
}

impl FNamePoolEntryOffsets {
    pub fn get_length(&self, header: u16) -> usize {
        let mask = if self.len_bits >= 16 { u16::MAX } else { (1u16 << self.len_bits) - 1 };
        let shifted = if self.len_shift >= 16 { 0 } else { header >> self.len_shift };
        (shifted & mask) as usize
    }

    pub fn is_wide(&self, header: u16) -> bool {
        self.wide_bit < 16 && (header >> self.wide_bit) & 1 == 1
    }

    pub fn string_offset(&self) -> u64 {
        self.header + 2
    }

    /// Byte offset of the forward id inside an outline-numbered entry.
    /// A six byte prefix is padded to keep the id four byte aligned.
    pub fn forward_id_offset(&self) -> u64 {
        let string_off = self.string_offset();
        if string_off == 6 {
            string_off + 2
        } else {
            string_off
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FUObjectArrayOffsets {
    pub obj_objects: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TUObjectArrayOffsets {
    pub objects: u64,
    #[serde(default)]
    pub num_elements: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FUObjectItemOffsets {
    pub object: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UObjectOffsets {
    pub internal_index: u64,
    #[serde(default)]
    pub class_private: u64,
    #[serde(default)]
    pub name_private: u64,
    #[serde(default)]
    pub outer_private: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UStructOffsets {
    pub properties_size: u64,
    pub children: u64,
    #[serde(default)]
    pub child_properties: u64,
}

impl UStructOffsets {
    pub fn children_field(&self) -> u64 {
        if self.child_properties != 0 {
            self.child_properties
        } else {
            self.children
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UFunctionOffsets {
    #[serde(rename = "EFunctionFlags")]
    pub function_flags: u64,
    pub param_size: u64,
}

/// Structural field offsets of one runtime build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UeOffsets {
    #[serde(rename = "FNameEntry", default, skip_serializing_if = "Option::is_none")]
    pub fname_entry: Option<FNameEntryOffsets>,
    #[serde(rename = "FNamePool", default, skip_serializing_if = "Option::is_none")]
    pub fname_pool: Option<FNamePoolOffsets>,
    #[serde(rename = "FNamePoolEntry", default, skip_serializing_if = "Option::is_none")]
    pub fname_pool_entry: Option<FNamePoolEntryOffsets>,
    #[serde(rename = "FUObjectArray")]
    pub fuobject_array: FUObjectArrayOffsets,
    #[serde(rename = "TUObjectArray")]
    pub tuobject_array: TUObjectArrayOffsets,
    #[serde(rename = "FUObjectItem")]
    pub fuobject_item: FUObjectItemOffsets,
    #[serde(rename = "UObject")]
    pub uobject: UObjectOffsets,
    #[serde(rename = "UStruct")]
    pub ustruct: UStructOffsets,
    #[serde(rename = "UFunction")]
    pub ufunction: UFunctionOffsets,
}

impl UeOffsets {
    pub fn has_name_sections(&self, use_fname_pool: bool) -> bool {
        if use_fname_pool {
            self.fname_pool.is_some() && self.fname_pool_entry.is_some()
        } else {
            self.fname_entry.is_some()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_header_length() {
        let entry = FNamePoolEntryOffsets::default();
        assert_eq!(entry.get_length(7 << 6), 7);
        assert_eq!(entry.get_length((7 << 6) | 1), 7);
        assert!(entry.is_wide(1));
        assert!(!entry.is_wide(7 << 6));
        assert_eq!(entry.get_length(0xFFFF), 1023);

        let old = FNamePoolEntryOffsets { header: 4, len_shift: 1, len_bits: 15, wide_bit: 0 };
        assert_eq!(old.get_length(14 << 1), 14);
    }

    #[test]
    fn test_forward_id_offset_alignment() {
        let zero = FNamePoolEntryOffsets::default();
        assert_eq!(zero.string_offset(), 2);
        assert_eq!(zero.forward_id_offset(), 2);

        let four = FNamePoolEntryOffsets { header: 4, ..Default::default() };
        assert_eq!(four.string_offset(), 6);
        assert_eq!(four.forward_id_offset(), 8);
    }

    #[test]
    fn test_pool_id_split() {
        let pool = FNamePoolOffsets { blocks_bit: 16, blocks_off: 0x10, stride: 2 };
        assert_eq!(pool.block_index(0x0003_0010), 3);
        assert_eq!(pool.offset_in_block(0x0003_0010), 0x20);
    }

    #[test]
    fn test_children_field_prefers_child_properties() {
        let mut ustruct = UStructOffsets { properties_size: 0x58, children: 0x48, child_properties: 0 };
        assert_eq!(ustruct.children_field(), 0x48);
        ustruct.child_properties = 0x50;
        assert_eq!(ustruct.children_field(), 0x50);
    }

    #[test]
    fn test_deserialize_catalogue() {
        let json = r#"{
            "FNamePool": { "BlocksBit": 16, "BlocksOff": 16, "Stride": 2 },
            "FNamePoolEntry": { "Header": 0 },
            "FUObjectArray": { "ObjObjects": 16 },
            "TUObjectArray": { "Objects": 0 },
            "FUObjectItem": { "Object": 0, "Size": 24 },
            "UObject": { "InternalIndex": 12 },
            "UStruct": { "PropertiesSize": 88, "Children": 72, "ChildProperties": 80 },
            "UFunction": { "EFunctionFlags": 176, "ParamSize": 180 }
        }"#;
        let offsets: UeOffsets = serde_json::from_str(json).unwrap();
        assert!(offsets.has_name_sections(true));
        assert!(!offsets.has_name_sections(false));
        assert_eq!(offsets.fname_pool_entry.unwrap().len_shift, 6);
        assert_eq!(offsets.ufunction.function_flags, 176);
        assert_eq!(offsets.fuobject_item.size, 24);
    }
}
