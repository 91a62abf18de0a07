pub mod actions;
pub mod config;
pub mod error;
pub mod platform;
pub mod psbt;
pub mod uri;

#[cfg(feature = "app")]
pub mod commands;

pub use actions::{ExportOutcome, FileActions, PickedFile, PlatformServices};
pub use config::FsConfig;
pub use error::FsError;
pub use psbt::TransactionPayload;

#[cfg(feature = "app")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;
    use tauri::Manager;

    use platform::dialog::{DialogAlerts, DialogPicker, DialogSaveShare};
    use platform::{CaptureBridge, PermissionBridge, RqrrDecoder, StoragePermission};

    tracing_subscriber::fmt::init();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_os::init())
        .setup(|app| {
            #[cfg(target_os = "android")]
            {
                if let Err(e) = platform::android::init_jvm_from_ndk_context() {
                    tracing::warn!("JNI unavailable, content URIs will not be readable: {}", e);
                }
            }

            let config = FsConfig::detect();
            let handle = app.handle().clone();
            let permission_bridge = Arc::new(PermissionBridge::storage_permission());

            #[cfg(target_os = "android")]
            let permission: Arc<dyn StoragePermission> = {
                use tauri::Emitter;

                let emitter = handle.clone();
                let prompt = platform::PromptedStoragePermission::new(
                    permission_bridge.clone(),
                    move |request| {
                        emitter
                            .emit("storage-permission-requested", request)
                            .map_err(|e| e.to_string())
                    },
                );
                Arc::new(platform::android::AndroidStoragePermission::new(prompt))
            };
            #[cfg(not(target_os = "android"))]
            let permission: Arc<dyn StoragePermission> =
                Arc::new(platform::dialog::DesktopStoragePermission);

            let files = platform::files::for_config(&config, permission);
            let capture = Arc::new(CaptureBridge::camera());
            let picker = Arc::new(DialogPicker::new(
                handle.clone(),
                files.clone(),
                config.temp_dir().join("picked"),
                capture.clone(),
            ));

            let services = PlatformServices {
                files,
                share: Arc::new(DialogSaveShare::new(handle.clone())),
                picker: picker.clone(),
                media: picker,
                qr: Arc::new(RqrrDecoder::new()),
                alerts: Arc::new(DialogAlerts::new(handle, config.messages.ok.clone())),
            };

            tracing::info!("File bridge ready for {:?}", config.platform);

            let actions: commands::FileActionsState = Arc::new(FileActions::new(config, services));
            app.manage(actions);
            app.manage::<commands::CaptureState>(capture);
            app.manage::<commands::PermissionState>(permission_bridge);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::write_file_and_export,
            commands::open_signed_transaction,
            commands::show_file_picker_and_read_file,
            commands::show_image_picker_and_read_image,
            commands::take_photo_and_read_qr,
            commands::read_file_outside_sandbox,
            commands::complete_camera_capture,
            commands::complete_storage_permission,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
