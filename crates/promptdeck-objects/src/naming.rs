// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collision-resistant object names and path checks.

use rand::Rng;

use promptdeck_core::ImageFolder;

/// Length of the random base36 token in generated names.
pub const TOKEN_LEN: usize = 13;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Extension used when the original file name carries none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Lowercased extension of `file_name`, or [`DEFAULT_EXTENSION`].
///
/// Only ASCII alphanumerics survive so a hostile name cannot inject path separators.
pub fn extension_of(file_name: &str) -> String {
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => return DEFAULT_EXTENSION.to_string(),
    };
    let ext: String = ext
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if ext.is_empty() {
        DEFAULT_EXTENSION.to_string()
    } else {
        ext
    }
}

fn random_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TOKEN_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// `{millis}-{token}.{ext}` for a file uploaded at `now_millis`.
pub fn object_name<R: Rng + ?Sized>(file_name: &str, now_millis: i64, rng: &mut R) -> String {
    format!("{now_millis}-{}.{}", random_token(rng), extension_of(file_name))
}

/// Full object path `{folder}/{name}` for a fresh upload.
pub fn object_path(folder: ImageFolder, file_name: &str) -> String {
    let now = chrono::Utc::now().timestamp_millis();
    format!(
        "{}/{}",
        folder.as_str(),
        object_name(file_name, now, &mut rand::thread_rng())
    )
}

/// True when `path` is `{Output|Reference}/{name}` with a single plain file name.
pub fn is_valid_object_path(path: &str) -> bool {
    let Some((folder, name)) = path.split_once('/') else {
        return false;
    };
    folder.parse::<ImageFolder>().is_ok()
        && !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && name != "."
        && name != ".."
}
