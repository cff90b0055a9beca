//! Image exclusion rules

/// URL fragments of decorative images that never belong in post content
pub const IMAGE_BLOCKLIST: &[&str] = &[
    "logo",
    "blur",
    "666292_a359a1aaa615404287862f1364f1c8b4",
    "666292_351a569704f0459280fc52170797efa9%7E",
    "f84b209469da4471b60850dc411d770b",
    "81af6121f84c41a5b4391d7d37fce12a",
    "203dcdc2ac8b48de89313f90d2a4cda1",
    "7528824071724d12a3e6c31eee0b40d4",
];

/// Alt text carried by the author's profile picture
pub const PROFILE_PICTURE_MARKER: &str = "Writer's picture";

/// True when an image with this URL and alt text must be dropped
pub fn is_blocked_image(src: &str, alt: &str) -> bool {
    alt.contains(PROFILE_PICTURE_MARKER) || IMAGE_BLOCKLIST.iter().any(|entry| src.contains(entry))
}
