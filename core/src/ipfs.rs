use serde::Deserialize;

use crate::score::id_last_digit;

pub const BLOCK_STAT_ENDPOINT: &str = "https://ipfs.infura.io:5001/api/v0/block/stat";
pub const DEFAULT_GATEWAY: &str = "https://ipfs.io";

pub fn mscz_ipfs_ref(main_cid: &str, id: u64) -> String {
    format!("/ipfs/{main_cid}/{}/{id}.mscz", id_last_digit(id))
}

pub fn mscz_cid_url(main_cid: &str, id: u64) -> String {
    format!("{BLOCK_STAT_ENDPOINT}?arg={}", mscz_ipfs_ref(main_cid, id))
}

pub fn gateway_url(gateway: &str, ipfs_ref: &str) -> String {
    format!("{}{ipfs_ref}", gateway.trim_end_matches('/'))
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BlockStat {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Size")]
    pub size: u64,
}

pub fn parse_block_stat(body: &str) -> Result<BlockStat, String> {
    serde_json::from_str(body).map_err(|err| err.to_string())
}
