pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::requests::{
    CreateUserRequest, UpdateUserRoleRequest, UpdateUserStatusRequest, UserListParams,
};
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 获取本校用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建本校账号
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 修改角色
    pub async fn update_role(
        &self,
        user_id: i64,
        update_data: UpdateUserRoleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_role(self, user_id, update_data, request).await
    }

    // 启用/停用
    pub async fn update_status(
        &self,
        user_id: i64,
        update_data: UpdateUserStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_status(self, user_id, update_data, request).await
    }

    // 删除账号
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }
}
