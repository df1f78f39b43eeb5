use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::helpers::load_yaml;

/// Device configuration profile sent by [`Client::upload`](crate::Client::upload).
///
/// Serialized under wire tags; read from YAML under the field names, with
/// anything missing taken from [`Config::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename(serialize = "1"))]
    pub touch_screen: u32,
    #[serde(rename(serialize = "2"))]
    pub keyboard: u32,
    #[serde(rename(serialize = "3"))]
    pub navigation: u32,
    #[serde(rename(serialize = "4"))]
    pub screen_layout: u32,
    #[serde(rename(serialize = "5"))]
    pub has_hard_keyboard: bool,
    #[serde(rename(serialize = "6"))]
    pub has_five_way_navigation: bool,
    #[serde(rename(serialize = "7"))]
    pub screen_density: u32,
    /// OpenGL ES version, major in the high 16 bits.
    #[serde(rename(serialize = "8"))]
    pub gl_es_version: u32,
    #[serde(rename(serialize = "9"))]
    pub system_shared_libraries: Vec<String>,
    #[serde(rename(serialize = "10"))]
    pub system_available_features: Vec<String>,
    #[serde(rename(serialize = "11"))]
    pub native_platforms: Vec<String>,
    #[serde(rename(serialize = "12"))]
    pub screen_width: u32,
    #[serde(rename(serialize = "13"))]
    pub screen_height: u32,
    #[serde(rename(serialize = "14"))]
    pub system_supported_locales: Vec<String>,
    #[serde(rename(serialize = "15"))]
    pub gl_extensions: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    /// A generic arm64 phone.
    fn default() -> Self {
        Self {
            touch_screen: 3,
            keyboard: 1,
            navigation: 1,
            screen_layout: 2,
            has_hard_keyboard: false,
            has_five_way_navigation: false,
            screen_density: 420,
            gl_es_version: 0x0003_0002,
            system_shared_libraries: strings(&["android.test.runner", "org.apache.http.legacy"]),
            system_available_features: strings(&[
                "android.hardware.camera",
                "android.hardware.faketouch",
                "android.hardware.location",
                "android.hardware.screen.portrait",
                "android.hardware.touchscreen",
                "android.hardware.wifi",
            ]),
            native_platforms: strings(&["arm64-v8a", "armeabi-v7a", "armeabi"]),
            screen_width: 1080,
            screen_height: 2340,
            system_supported_locales: strings(&["en_US"]),
            gl_extensions: strings(&[
                "GL_KHR_texture_compression_astc_ldr",
                "GL_OES_compressed_ETC1_RGB8_texture",
            ]),
        }
    }
}

impl Config {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path.as_ref())
    }
}
