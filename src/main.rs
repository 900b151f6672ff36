// Prevents additional console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod commands;
mod deepseek;
mod episode;
mod error;
mod project;
mod settings;

use commands::{ai::*, episode::*, file_system::*, project::*, settings::*};
use settings::{AppState, SettingsStore};
use tauri::menu::{MenuBuilder, MenuItem, SubmenuBuilder};
use tauri::{Emitter, Manager};

fn main() {
    tracing_subscriber::fmt::init();

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        .plugin(tauri_plugin_window_state::Builder::new().build())
        .setup(|app| {
            // 设置存储放在应用配置目录，随应用状态注入各命令
            let config_dir = app.path().app_config_dir().unwrap_or_else(|_| {
                dirs::config_dir()
                    .unwrap_or_else(|| std::path::PathBuf::from("."))
                    .join("dubstudio")
            });
            app.manage(AppState::new(SettingsStore::load(config_dir.join("store.json"))));

            // ── 原生系统菜单 ──
            let handle = app.handle();

            let file_menu = SubmenuBuilder::new(handle, "文件")
                .item(&MenuItem::with_id(
                    handle,
                    "new_project",
                    "新建项目",
                    true,
                    Some("CmdOrCtrl+N"),
                )?)
                .item(&MenuItem::with_id(
                    handle,
                    "open_project",
                    "打开项目",
                    true,
                    Some("CmdOrCtrl+O"),
                )?)
                .separator()
                .quit()
                .build()?;

            let edit_menu = SubmenuBuilder::new(handle, "编辑")
                .undo()
                .redo()
                .separator()
                .cut()
                .copy()
                .paste()
                .select_all()
                .build()?;

            let view_menu = SubmenuBuilder::new(handle, "视图")
                .item(&MenuItem::with_id(
                    handle,
                    "toggle_fullscreen",
                    "切换全屏",
                    true,
                    None::<&str>,
                )?)
                .build()?;

            let menu = MenuBuilder::new(handle)
                .item(&file_menu)
                .item(&edit_menu)
                .item(&view_menu)
                .build()?;
            app.set_menu(menu)?;

            // 菜单事件作为自定义事件转发给前端
            app.on_menu_event(move |app_handle, event| {
                let id = event.id().0.as_str();
                if let Some(window) = app_handle.get_webview_window("main") {
                    let _ = window.emit("menu-event", id);
                }
            });

            #[cfg(debug_assertions)]
            {
                if let Some(window) = app.get_webview_window("main") {
                    window.open_devtools();
                }
            }

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // 项目
            create_project,
            list_projects,
            update_project,
            delete_project,
            // 剧集
            create_episode,
            list_episodes,
            update_episode,
            delete_episode,
            update_episode_characters,
            get_episode_characters,
            write_episode_file,
            read_episode_file,
            // 设置与日志
            save_settings,
            get_settings,
            get_config_path,
            write_log,
            // 通用文件读写
            read_file,
            write_file,
            // AI
            call_deepseek,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
