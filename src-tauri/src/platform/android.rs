//! Android bridges over JNI.
//!
//! Provides:
//! - reading `content://` URIs handed out by the system document picker
//! - their display names (`OpenableColumns.DISPLAY_NAME`)
//! - the device API level
//! - the WRITE_EXTERNAL_STORAGE permission state
//! - opening the app's system settings page
//!
//! The runtime permission prompt itself needs an Activity result callback, so
//! [`AndroidStoragePermission`] hands it to the frontend when the permission
//! is not held yet.

use async_trait::async_trait;
use jni::objects::{JObject, JString, JValue};
use jni::JNIEnv;
use std::sync::OnceLock;

use super::{PermissionRationale, PermissionStatus, PromptedStoragePermission, StoragePermission};
use crate::error::FsError;

/// Global JVM reference for Android
static JAVA_VM: OnceLock<jni::JavaVM> = OnceLock::new();

const WRITE_EXTERNAL_STORAGE: &str = "android.permission.WRITE_EXTERNAL_STORAGE";
const PERMISSION_GRANTED: i32 = 0;
const READ_CHUNK: i32 = 64 * 1024;
const FLAG_ACTIVITY_NEW_TASK: i32 = 0x10000000;
const DISPLAY_NAME: &str = "_display_name";

/// Initialize the JVM reference (called from Tauri's Android setup)
pub fn init_jvm(vm: jni::JavaVM) {
    let _ = JAVA_VM.set(vm);
}

/// Initialize the JVM reference from the NDK activity context
pub fn init_jvm_from_ndk_context() -> Result<(), FsError> {
    let ctx = ndk_context::android_context();
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| FsError::Platform(format!("Failed to get JavaVM: {}", e)))?;
    init_jvm(vm);
    Ok(())
}

fn jni_error(what: &'static str) -> impl Fn(jni::errors::Error) -> FsError {
    move |e| FsError::Platform(format!("{}: {}", what, e))
}

/// Get JNI environment
fn get_env() -> Result<jni::AttachGuard<'static>, FsError> {
    let vm = JAVA_VM
        .get()
        .ok_or_else(|| FsError::Platform("JVM not initialized".to_string()))?;

    vm.attach_current_thread()
        .map_err(|e| FsError::Platform(format!("Failed to attach to JVM: {}", e)))
}

fn application_context<'a>(env: &mut JNIEnv<'a>) -> Result<JObject<'a>, FsError> {
    let activity_thread = env
        .call_static_method(
            "android/app/ActivityThread",
            "currentActivityThread",
            "()Landroid/app/ActivityThread;",
            &[],
        )
        .map_err(jni_error("Failed to get ActivityThread"))?
        .l()
        .map_err(jni_error("Failed to convert ActivityThread"))?;

    env.call_method(
        activity_thread,
        "getApplication",
        "()Landroid/app/Application;",
        &[],
    )
    .map_err(jni_error("Failed to get Application"))?
    .l()
    .map_err(jni_error("Failed to convert Application"))
}

fn content_resolver<'a>(env: &mut JNIEnv<'a>) -> Result<JObject<'a>, FsError> {
    let context = application_context(env)?;

    env.call_method(
        &context,
        "getContentResolver",
        "()Landroid/content/ContentResolver;",
        &[],
    )
    .map_err(jni_error("Failed to get ContentResolver"))?
    .l()
    .map_err(jni_error("Failed to convert ContentResolver"))
}

fn parse_uri<'a>(env: &mut JNIEnv<'a>, uri: &str) -> Result<JObject<'a>, FsError> {
    let uri_string = env
        .new_string(uri)
        .map_err(jni_error("Failed to create uri string"))?;

    env.call_static_method(
        "android/net/Uri",
        "parse",
        "(Ljava/lang/String;)Landroid/net/Uri;",
        &[JValue::Object(&uri_string)],
    )
    .map_err(jni_error("Failed to parse uri"))?
    .l()
    .map_err(jni_error("Failed to convert Uri"))
}

/// Read the whole content behind a `content://` URI
pub fn read_content_uri(uri: &str) -> Result<Vec<u8>, FsError> {
    let mut env = get_env()?;
    let resolver = content_resolver(&mut env)?;
    let parsed = parse_uri(&mut env, uri)?;

    let stream = env
        .call_method(
            &resolver,
            "openInputStream",
            "(Landroid/net/Uri;)Ljava/io/InputStream;",
            &[JValue::Object(&parsed)],
        )
        .map_err(jni_error("Failed to open input stream"))?
        .l()
        .map_err(jni_error("Failed to convert InputStream"))?;

    if stream.is_null() {
        return Err(FsError::Platform(format!("No content for {}", uri)));
    }

    let buffer = env
        .new_byte_array(READ_CHUNK)
        .map_err(jni_error("Failed to allocate read buffer"))?;
    let mut chunk = vec![0i8; READ_CHUNK as usize];
    let mut contents = Vec::new();

    loop {
        let read = env
            .call_method(&stream, "read", "([B)I", &[JValue::Object(&buffer)])
            .map_err(jni_error("Failed to read stream"))?
            .i()
            .map_err(jni_error("Failed to convert read count"))?;

        if read < 0 {
            break;
        }

        let filled = &mut chunk[..read as usize];
        env.get_byte_array_region(&buffer, 0, filled)
            .map_err(jni_error("Failed to copy read buffer"))?;
        contents.extend(filled.iter().map(|b| *b as u8));
    }

    env.call_method(&stream, "close", "()V", &[])
        .map_err(jni_error("Failed to close stream"))?;

    tracing::info!("Read {} bytes from content uri", contents.len());
    Ok(contents)
}

/// Display name of a `content://` document, if the provider reports one
pub fn query_display_name(uri: &str) -> Result<Option<String>, FsError> {
    let mut env = get_env()?;
    let resolver = content_resolver(&mut env)?;
    let parsed = parse_uri(&mut env, uri)?;

    let column = env
        .new_string(DISPLAY_NAME)
        .map_err(jni_error("Failed to create column name"))?;
    let projection = env
        .new_object_array(1, "java/lang/String", &column)
        .map_err(jni_error("Failed to create projection"))?;
    let none = JObject::null();

    let cursor = env
        .call_method(
            &resolver,
            "query",
            "(Landroid/net/Uri;[Ljava/lang/String;Ljava/lang/String;[Ljava/lang/String;Ljava/lang/String;)Landroid/database/Cursor;",
            &[
                JValue::Object(&parsed),
                JValue::Object(&projection),
                JValue::Object(&none),
                JValue::Object(&none),
                JValue::Object(&none),
            ],
        )
        .map_err(jni_error("Failed to query content uri"))?
        .l()
        .map_err(jni_error("Failed to convert Cursor"))?;

    if cursor.is_null() {
        return Ok(None);
    }

    let has_row = env
        .call_method(&cursor, "moveToFirst", "()Z", &[])
        .map_err(jni_error("Failed to move cursor"))?
        .z()
        .map_err(jni_error("Failed to convert cursor state"))?;

    let name = if has_row {
        let value = env
            .call_method(&cursor, "getString", "(I)Ljava/lang/String;", &[JValue::Int(0)])
            .map_err(jni_error("Failed to read display name"))?
            .l()
            .map_err(jni_error("Failed to convert display name"))?;

        if value.is_null() {
            None
        } else {
            let value: JString = value.into();
            let name: String = env
                .get_string(&value)
                .map_err(jni_error("Failed to decode display name"))?
                .into();
            Some(name)
        }
    } else {
        None
    };

    env.call_method(&cursor, "close", "()V", &[])
        .map_err(jni_error("Failed to close cursor"))?;

    Ok(name)
}

/// `Build.VERSION.SDK_INT` of the running device
pub fn sdk_version() -> Result<u32, FsError> {
    let mut env = get_env()?;
    let sdk = env
        .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
        .map_err(jni_error("Failed to get SDK_INT"))?
        .i()
        .map_err(jni_error("Failed to convert SDK_INT"))?;
    Ok(sdk.max(0) as u32)
}

fn has_write_storage_permission() -> Result<bool, FsError> {
    let mut env = get_env()?;
    let context = application_context(&mut env)?;

    let permission = env
        .new_string(WRITE_EXTERNAL_STORAGE)
        .map_err(jni_error("Failed to create permission string"))?;

    let result = env
        .call_method(
            &context,
            "checkSelfPermission",
            "(Ljava/lang/String;)I",
            &[JValue::Object(&permission)],
        )
        .map_err(jni_error("Failed to check permission"))?
        .i()
        .map_err(jni_error("Failed to convert permission result"))?;

    Ok(result == PERMISSION_GRANTED)
}

/// Open this app's page in the system settings
pub fn open_app_settings() -> Result<(), FsError> {
    let mut env = get_env()?;
    let context = application_context(&mut env)?;

    let action = env
        .get_static_field(
            "android/provider/Settings",
            "ACTION_APPLICATION_DETAILS_SETTINGS",
            "Ljava/lang/String;",
        )
        .map_err(jni_error("Failed to get settings action"))?
        .l()
        .map_err(jni_error("Failed to convert settings action"))?;

    let intent = env
        .new_object("android/content/Intent", "(Ljava/lang/String;)V", &[JValue::Object(&action)])
        .map_err(jni_error("Failed to create Intent"))?;

    let package_name: JString = env
        .call_method(&context, "getPackageName", "()Ljava/lang/String;", &[])
        .map_err(jni_error("Failed to get package name"))?
        .l()
        .map_err(jni_error("Failed to convert package name"))?
        .into();
    let package_name: String = env
        .get_string(&package_name)
        .map_err(jni_error("Failed to read package name"))?
        .into();

    let package_uri = env
        .new_string(format!("package:{}", package_name))
        .map_err(jni_error("Failed to create package uri"))?;
    let uri = env
        .call_static_method(
            "android/net/Uri",
            "parse",
            "(Ljava/lang/String;)Landroid/net/Uri;",
            &[JValue::Object(&package_uri)],
        )
        .map_err(jni_error("Failed to parse package uri"))?
        .l()
        .map_err(jni_error("Failed to convert package uri"))?;

    env.call_method(
        &intent,
        "setData",
        "(Landroid/net/Uri;)Landroid/content/Intent;",
        &[JValue::Object(&uri)],
    )
    .map_err(jni_error("Failed to set intent data"))?;

    env.call_method(
        &intent,
        "addFlags",
        "(I)Landroid/content/Intent;",
        &[JValue::Int(FLAG_ACTIVITY_NEW_TASK)],
    )
    .map_err(jni_error("Failed to set intent flags"))?;

    env.call_method(
        &context,
        "startActivity",
        "(Landroid/content/Intent;)V",
        &[JValue::Object(&intent)],
    )
    .map_err(jni_error("Failed to start settings activity"))?;

    Ok(())
}

/// Storage permission: granted state from `Context.checkSelfPermission`,
/// otherwise the frontend's runtime prompt
pub struct AndroidStoragePermission {
    prompt: PromptedStoragePermission,
}

impl AndroidStoragePermission {
    pub fn new(prompt: PromptedStoragePermission) -> Self {
        Self { prompt }
    }
}

#[async_trait]
impl StoragePermission for AndroidStoragePermission {
    async fn request(&self, rationale: &PermissionRationale) -> PermissionStatus {
        match tokio::task::spawn_blocking(has_write_storage_permission).await {
            Ok(Ok(true)) => return PermissionStatus::Granted,
            Ok(Ok(false)) => {}
            Ok(Err(e)) => tracing::warn!("Storage permission check failed: {}", e),
            Err(e) => tracing::warn!("Storage permission task failed: {}", e),
        }

        tracing::debug!("Prompting for storage permission ({})", rationale.title);
        self.prompt.request(rationale).await
    }
}
