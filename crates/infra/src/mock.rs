//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! mealbell-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use mealbell_domain::{
    menu::{Menu, MenuId},
    notification::{DeliveryFailure, RequestSnapshot, WebhookMessage},
    order::{EmployeeId, NewOrder},
};

use crate::{
    error::InfraError,
    notification::MessageDispatcher,
    repository::{MenuRepository, OrderRepository},
};

// ===== MockMenuRepository =====

#[derive(Clone, Default)]
pub struct MockMenuRepository {
    menus: Arc<Mutex<Vec<Menu>>>,
}

impl MockMenuRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_menu(&self, menu: Menu) {
        self.menus.lock().unwrap().push(menu);
    }

    /// 保存されているメニューを取得する（検証用）
    pub fn menu(&self, id: &MenuId) -> Option<Menu> {
        self.menus
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id() == id)
            .cloned()
    }
}

#[async_trait]
impl MenuRepository for MockMenuRepository {
    async fn find_by_id(&self, id: &MenuId) -> Result<Option<Menu>, InfraError> {
        Ok(self.menu(id))
    }

    async fn find_published_by_id(&self, id: &MenuId) -> Result<Option<Menu>, InfraError> {
        Ok(self.menu(id).filter(Menu::is_published))
    }

    async fn mark_published(&self, id: &MenuId) -> Result<bool, InfraError> {
        let mut menus = self.menus.lock().unwrap();
        let Some(position) = menus.iter().position(|m| m.id() == id) else {
            return Ok(false);
        };
        let menu = menus.remove(position).published();
        menus.insert(position, menu);
        Ok(true)
    }
}

// ===== MockOrderRepository =====

#[derive(Clone, Default)]
pub struct MockOrderRepository {
    orders: Arc<Mutex<Vec<NewOrder>>>,
}

impl MockOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録済みの注文（検証用）
    pub fn orders(&self) -> Vec<NewOrder> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn exists(
        &self,
        employee_id: &EmployeeId,
        menu_id: &MenuId,
    ) -> Result<bool, InfraError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .any(|o| &o.employee_id == employee_id && &o.menu_id == menu_id))
    }

    async fn insert(&self, order: &NewOrder) -> Result<bool, InfraError> {
        let mut orders = self.orders.lock().unwrap();
        if orders
            .iter()
            .any(|o| o.employee_id == order.employee_id && o.menu_id == order.menu_id)
        {
            return Ok(false);
        }
        orders.push(order.clone());
        Ok(true)
    }
}

// ===== MockMessageDispatcher =====

/// 送信を記録するモック
///
/// `fail_for` で指定した送信先には 500 を受信したものとして失敗を返す。
/// 失敗した送信も試行として記録する。
#[derive(Clone, Default)]
pub struct MockMessageDispatcher {
    attempts: Arc<Mutex<Vec<(String, WebhookMessage)>>>,
    failing:  Arc<Mutex<HashSet<String>>>,
}

impl MockMessageDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した送信先への送信を失敗させる
    pub fn fail_for(&self, address: impl Into<String>) {
        self.failing.lock().unwrap().insert(address.into());
    }

    /// 試行した（送信先, メッセージ）の一覧
    pub fn attempts(&self) -> Vec<(String, WebhookMessage)> {
        self.attempts.lock().unwrap().clone()
    }

    /// 試行した送信先の一覧
    pub fn attempted_addresses(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|(address, _)| address.clone())
            .collect()
    }
}

#[async_trait]
impl MessageDispatcher for MockMessageDispatcher {
    async fn dispatch(
        &self,
        message: &WebhookMessage,
        address: &str,
    ) -> Result<(), DeliveryFailure> {
        self.attempts
            .lock()
            .unwrap()
            .push((address.to_string(), message.clone()));

        if self.failing.lock().unwrap().contains(address) {
            return Err(DeliveryFailure::rejected(
                500,
                RequestSnapshot {
                    address: address.to_string(),
                    headers: vec![("content-type".to_string(), "application/json".to_string())],
                    body:    message.text.clone(),
                },
            ));
        }

        Ok(())
    }
}
