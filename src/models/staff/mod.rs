use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;
use crate::models::students::entities::Gender;

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/staff.ts")]
    pub enum StaffStatus ("教职工状态") {
        Active => "active",
        Inactive => "inactive",
        Retired => "retired",
    }
}

// 教职工
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/staff.ts")]
pub struct Staff {
    pub id: i64,
    pub school_id: i64,
    pub nip: Option<String>,
    pub full_name: String,
    pub gender: Gender,
    pub position_id: Option<i64>,
    /// 职位名称（列表查询时填充）
    pub position_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub status: StaffStatus,
    pub join_date: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 职位（只读主数据）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/staff.ts")]
pub struct Position {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/staff.ts")]
pub struct StaffPayload {
    pub nip: Option<String>,
    pub full_name: String,
    pub gender: Gender,
    pub position_id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub join_date: String,
    /// 仅编辑时生效，新建一律为 active
    pub status: Option<StaffStatus>,
}

/// 规范化后写入存储层的教职工数据
#[derive(Debug, Clone)]
pub struct StaffRecord {
    pub nip: Option<String>,
    pub full_name: String,
    pub gender: Gender,
    pub position_id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub join_date: String,
    pub status: StaffStatus,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/staff.ts")]
pub struct StaffResponse {
    pub staff: Staff,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/staff.ts")]
pub struct StaffListResponse {
    pub items: Vec<Staff>,
}
