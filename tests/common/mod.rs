//! 测试公共工具：mock 上游 + 固定身份的 AppState

#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;

use terabox_direct_link::terabox::FixedIdentity;
use terabox_direct_link::{AppState, Config};

pub const SHARE_ID: &str = "1abcDEF";
pub const TEST_UA: &str = "terabox-test-agent/1.0";
pub const JS_TOKEN: &str = "JSTOKEN123";
pub const LOGID: &str = "LOG-42";

pub fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.terabox.base_url = base_url.to_string();
    config.terabox.http_timeout_secs = 5;
    config
}

pub fn test_state(config: Config) -> AppState {
    AppState::with_identity(config, Arc::new(FixedIdentity(TEST_UA.to_string()))).unwrap()
}

pub fn share_url() -> String {
    format!("https://teraboxapp.com/s/{}", SHARE_ID)
}

pub fn landing_html(with_logid: bool) -> String {
    let logid = if with_logid {
        format!("window.yunData = {{ logid: '{}' }};", LOGID)
    } else {
        String::new()
    };
    format!(
        r#"<html><head><script>var jsToken = "{}"; {}</script></head><body></body></html>"#,
        JS_TOKEN, logid
    )
}

/// 分享落地页，带两条 Set-Cookie
pub async fn mock_landing<'a>(server: &'a MockServer, html: String) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/s/{}", SHARE_ID))
                .header("user-agent", TEST_UA);
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .header("set-cookie", "ndus=AAA; Path=/; HttpOnly")
                .header("set-cookie", "csrfToken=BBB; Path=/")
                .body(html);
        })
        .await
}

/// 列表接口，校验会话参数是否正确传递
pub async fn mock_listing<'a>(server: &'a MockServer, logid: &str, body: Value) -> Mock<'a> {
    let logid = logid.to_string();
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/shorturlinfo")
                .query_param("surl", SHARE_ID)
                .query_param("logid", logid)
                .query_param_exists("uk")
                .query_param_exists("shareid")
                .query_param_exists("primaryid")
                .header("user-agent", TEST_UA)
                .header("cookie", "ndus=AAA; csrfToken=BBB")
                .header("x-requested-with", "XMLHttpRequest");
            then.status(200).json_body(body);
        })
        .await
}

/// 单个文件的直链接口
pub async fn mock_link<'a>(server: &'a MockServer, fs_id: &str, body: Value) -> Mock<'a> {
    let fsids = format!("[{}]", fs_id);
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/get-download-link")
                .query_param("surl", SHARE_ID)
                .query_param("fsids", fsids)
                .query_param("sign", JS_TOKEN)
                .query_param_exists("timestamp")
                .header("user-agent", TEST_UA);
            then.status(200).json_body(body);
        })
        .await
}

pub fn link_ok(fs_id: &str, name: &str, size: u64) -> Value {
    json!({
        "errno": 0,
        "list": [{
            "fs_id": fs_id,
            "server_filename": name,
            "dlink": format!("https://d.terabox.test/file/{}?sign=xyz", fs_id),
            "size": size,
            "md5": format!("md5-{}", fs_id)
        }]
    })
}

pub fn link_err(errno: i64) -> Value {
    json!({"errno": errno, "errmsg": "need verify", "list": []})
}

/// 两个文件 + 一个包含一个文件的文件夹
pub fn listing_two_files_one_folder() -> Value {
    json!({
        "errno": 0,
        "title": "Holiday",
        "ukinfo": {"uname": "alice", "avatar_url": "https://img.test/alice.png"},
        "pwd": "ab12",
        "expireTime": 1735689600,
        "list": [
            {"isdir": 0, "server_filename": "readme.txt", "fs_id": 11, "size": 1024, "md5": "m11"},
            {"isdir": "1", "server_filename": "Videos", "fs_id": "20", "children": [
                {"isdir": 0, "server_filename": "clip.mp4", "fs_id": 21, "size": "1536",
                 "thumbs": {"url3": "https://thumb.test/21"}}
            ]},
            {"isdir": 0, "server_filename": "photo.jpg", "fs_id": 12, "size": 2048}
        ]
    })
}

pub fn listing_with_files(ids: &[&str]) -> Value {
    let list: Vec<Value> = ids
        .iter()
        .map(|id| json!({"isdir": 0, "server_filename": format!("f{}.bin", id), "fs_id": id, "size": 10}))
        .collect();
    json!({"errno": 0, "title": "Batch", "list": list})
}
