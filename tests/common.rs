#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Local, TimeZone, Utc};
use fixtrack::core::agents::AgentLogic;
use fixtrack::db::initialize::init_db;
use fixtrack::db::pool::DbPool;
use fixtrack::models::agent::Agent;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn fxt() -> Command {
    let mut cmd = cargo_bin_cmd!("fixtrack");
    cmd.env("NO_COLOR", "1").env_remove("FIXTRACK_TOKEN");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_fixtrack.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Fresh media directory for photo uploads.
pub fn setup_media_dir(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_fixtrack_media", name));
    fs::remove_dir_all(&path).ok();
    path.to_string_lossy().to_string()
}

/// Write a small fake photo and return its path.
pub fn fake_photo(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_shop.jpg", name));
    fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]).expect("write photo");
    path.to_string_lossy().to_string()
}

/// Open a migrated pool on a fresh DB file (library-level tests).
pub fn open_test_pool(name: &str) -> DbPool {
    let db_path = setup_test_db(name);
    let pool = DbPool::new(&db_path).expect("open db");
    init_db(&pool.conn).expect("init db");
    pool
}

/// Local wall-clock instant on 2025-09-01, as stored (UTC).
pub fn at(hour: u32, min: u32) -> DateTime<Utc> {
    at_on(2025, 9, 1, hour, min)
}

pub fn at_on(y: i32, m: u32, d: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(y, m, d, hour, min, 0)
        .earliest()
        .expect("valid local time")
        .with_timezone(&Utc)
}

pub fn register(pool: &mut DbPool, name: &str) -> (Agent, String) {
    AgentLogic::register(pool, name, at(7, 0)).expect("register agent")
}

/// Init a DB through the CLI and register one agent; returns its token.
pub fn init_with_agent(db_path: &str, name: &str) -> String {
    fxt()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    let out = fxt()
        .args(["--db", db_path, "--test", "agent", "register", name])
        .output()
        .expect("register agent");
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    stdout
        .lines()
        .find_map(|l| l.strip_prefix("token: "))
        .expect("token line")
        .trim()
        .to_string()
}
