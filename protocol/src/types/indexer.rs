use ckb_jsonrpc_types::{BlockNumber, CellOutput, JsonBytes, OutPoint, Script, Uint32, Uint64};
use ckb_types::packed;
use serde::{Deserialize, Serialize};

// Wire types of the indexer `get_cells` method.

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
    Lock,
    Type,
}

/// How the indexer compares `SearchKey::script` args. The indexer assumes
/// `Prefix` when the field is absent.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScriptSearchMode {
    Prefix,
    Exact,
    Partial,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq, Eq)]
pub struct SearchKeyFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<Script>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_len_range: Option<[Uint64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_data_len_range: Option<[Uint64; 2]>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchKey {
    pub script: Script,
    pub script_type: ScriptType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_search_mode: Option<ScriptSearchMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<SearchKeyFilter>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct IndexerCell {
    pub output: CellOutput,
    #[serde(default)]
    pub output_data: Option<JsonBytes>,
    pub out_point: OutPoint,
    pub block_number: BlockNumber,
    pub tx_index: Uint32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Pagination<T> {
    pub objects: Vec<T>,
    pub last_cursor: JsonBytes,
}

/// What a type script of a collected cell must look like.
#[derive(Clone, Debug)]
pub enum TypeFilter {
    Any,
    /// Only cells without a type script.
    Empty,
    Script(packed::Script),
}

/// Client-side description of a cell query: always by owner lock, optionally
/// narrowed by type script and by output data length `[min, max)`.
#[derive(Clone, Debug)]
pub struct CellFilter {
    pub lock: packed::Script,
    pub type_filter: TypeFilter,
    pub data_len_range: Option<(u64, u64)>,
}

impl CellFilter {
    pub fn by_lock(lock: &packed::Script) -> Self {
        CellFilter {
            lock: lock.clone(),
            type_filter: TypeFilter::Any,
            data_len_range: None,
        }
    }

    pub fn bare_capacity(lock: &packed::Script) -> Self {
        CellFilter {
            lock: lock.clone(),
            type_filter: TypeFilter::Empty,
            data_len_range: Some((0, 1)),
        }
    }
}

impl From<&CellFilter> for SearchKey {
    fn from(filter: &CellFilter) -> Self {
        let mut key_filter = SearchKeyFilter::default();
        match &filter.type_filter {
            TypeFilter::Any => {}
            TypeFilter::Empty => {
                key_filter.script_len_range = Some([0u64.into(), 1u64.into()]);
            }
            TypeFilter::Script(script) => {
                key_filter.script = Some(script.clone().into());
            }
        }
        if let Some((min, max)) = filter.data_len_range {
            key_filter.output_data_len_range = Some([min.into(), max.into()]);
        }
        SearchKey {
            script: filter.lock.clone().into(),
            script_type: ScriptType::Lock,
            script_search_mode: Some(ScriptSearchMode::Exact),
            filter: if key_filter == SearchKeyFilter::default() {
                None
            } else {
                Some(key_filter)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ckb_types::prelude::{Builder, Entity};

    #[test]
    fn bare_capacity_filter_serializes_like_indexer_expects() {
        let lock = packed::Script::new_builder().build();
        let key = SearchKey::from(&CellFilter::bare_capacity(&lock));
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json["script_type"], "lock");
        assert_eq!(json["filter"]["script_len_range"][0], "0x0");
        assert_eq!(json["filter"]["script_len_range"][1], "0x1");
        assert_eq!(json["filter"]["output_data_len_range"][1], "0x1");
        assert!(json["filter"].get("script").is_none());
    }

    #[test]
    fn lock_only_filter_has_no_filter_object() {
        let lock = packed::Script::new_builder().build();
        let key = SearchKey::from(&CellFilter::by_lock(&lock));
        assert!(key.filter.is_none());
        let json = serde_json::to_value(&key).unwrap();
        assert!(json.get("filter").is_none());
    }

    #[test]
    fn lock_is_matched_exactly() {
        let lock = packed::Script::new_builder().build();
        for filter in [CellFilter::by_lock(&lock), CellFilter::bare_capacity(&lock)] {
            let json = serde_json::to_value(&SearchKey::from(&filter)).unwrap();
            assert_eq!(json["script_search_mode"], "exact");
        }
    }
}
