//! メニュー通知ジョブの結合テスト
//!
//! メニューはインメモリのリポジトリから取得し、送信は実際の
//! `SlackWebhookDispatcher` で httpmock のサーバーへ POST する。

use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;
use httpmock::prelude::*;
use mealbell_domain::menu::{Employee, Menu, MenuId, MenuOption, Order};
use mealbell_infra::{mock::MockMenuRepository, notification::SlackWebhookDispatcher};
use mealbell_notifier::usecase::{
    MenuNotificationJob,
    NotificationTrigger,
    PublishMenuUseCase,
    PublishOutcome,
    notification::MenuDigestRenderer,
};
use serde_json::json;

const DIGEST: &str = "Hello!\nI share with you today's menu :)\n\nOption 1: Pastel de choclo\nOption 2: Cazuela\n\nHave a nice day!";

fn job(menu_repo: &MockMenuRepository, concurrency: usize) -> Arc<MenuNotificationJob> {
    Arc::new(
        MenuNotificationJob::new(
            Arc::new(menu_repo.clone()),
            Arc::new(MenuDigestRenderer::new().unwrap()),
            Arc::new(SlackWebhookDispatcher::new(Duration::from_secs(5)).unwrap()),
        )
        .with_dispatch_concurrency(concurrency),
    )
}

fn menu(server: &MockServer) -> Menu {
    let order = |name: &str, nationality: &str, path: &str| {
        Order::new(
            Employee::new(name, Some(nationality), Some(server.url(path).as_str())),
            1,
            "",
        )
    };

    Menu::new(
        MenuId::new(),
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        false,
        vec![
            MenuOption::new("Cazuela", 2),
            MenuOption::new("Pastel de choclo", 1),
        ],
        vec![
            order("Ana", "CL", "/hooks/ana"),
            order("Juan", "AR", "/hooks/juan"),
            order("Camila", "CL", "/hooks/camila"),
            order("Diego", "CL", "/hooks/diego"),
        ],
    )
}

#[tokio::test]
async fn test_2番目の受信者が404でも全受信者へ送信する() {
    let server = MockServer::start_async().await;
    let ana = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hooks/ana")
                .header("content-type", "application/json")
                .json_body(json!({ "text": DIGEST }));
            then.status(200);
        })
        .await;
    let camila = server
        .mock_async(|when, then| {
            when.method(POST).path("/hooks/camila");
            then.status(404).body("no_service");
        })
        .await;
    let diego = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hooks/diego")
                .json_body(json!({ "text": DIGEST }));
            then.status(200);
        })
        .await;
    let juan = server
        .mock_async(|when, then| {
            when.method(POST).path("/hooks/juan");
            then.status(200);
        })
        .await;

    let menu_repo = MockMenuRepository::new();
    let menu = menu(&server);
    let menu_id = menu.id().clone();
    menu_repo.add_menu(menu);

    let result = job(&menu_repo, 1)
        .notify_menu_published(&menu_id, "CL")
        .await;

    assert!(result.is_ok());
    ana.assert_async().await;
    camila.assert_async().await;
    diego.assert_async().await;
    juan.assert_hits_async(0).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_並行送信でも全受信者へ1回ずつ送信する() {
    let server = MockServer::start_async().await;
    let hooks = server
        .mock_async(|when, then| {
            when.method(POST).path_contains("/hooks/");
            then.status(200);
        })
        .await;

    let menu_repo = MockMenuRepository::new();
    let menu = menu(&server);
    let menu_id = menu.id().clone();
    menu_repo.add_menu(menu);

    job(&menu_repo, 3)
        .notify_menu_published(&menu_id, "CL")
        .await
        .unwrap();

    hooks.assert_hits_async(3).await;
}

#[tokio::test]
async fn test_公開すると通知が送信され公開済みになる() {
    let server = MockServer::start_async().await;
    let hooks = server
        .mock_async(|when, then| {
            when.method(POST).path_contains("/hooks/");
            then.status(200);
        })
        .await;

    let menu_repo = MockMenuRepository::new();
    let menu = menu(&server);
    let menu_id = menu.id().clone();
    menu_repo.add_menu(menu);
    let usecase = PublishMenuUseCase::new(
        Arc::new(menu_repo.clone()),
        NotificationTrigger::new(job(&menu_repo, 1)),
    );

    let PublishOutcome::Published { notification } =
        usecase.publish(&menu_id, "AR").await.unwrap()
    else {
        panic!("Published を期待した");
    };
    notification.await.unwrap();

    assert!(menu_repo.menu(&menu_id).unwrap().is_published());
    hooks.assert_hits_async(1).await;
}
