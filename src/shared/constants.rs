/// Upper bound on configured upload fields per form. The editor's add
/// control is a silent no-op once this is reached.
pub const MAX_UPLOAD_FIELDS: usize = 3;

/// Title used when a form is created without one.
pub const DEFAULT_FORM_TITLE: &str = "Untitled Form";

/// Name of the per-form subfolder that receives logo/cover assets.
pub const ASSETS_FOLDER_NAME: &str = "Form Assets";

/// Drive mime type identifying folders.
pub const DRIVE_FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Fixed User-Agent sent on every image-proxy upstream attempt. Google's
/// CDN endpoints filter requests that don't look like a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Cache header for proxied images; file ids are immutable so the body
/// never changes for a given URL.
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Trailing-debounce delay for editor auto-save.
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 1000;
