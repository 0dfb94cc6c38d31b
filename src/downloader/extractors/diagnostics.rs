// Failure diagnostics - classifies yt-dlp error output
//
// yt-dlp reports every failure as free text on stderr. The patterns below
// pick out the common causes so the printed diagnostic can carry a hint.

use regex::Regex;

/// Reasons why a yt-dlp request might fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingReason {
    /// HTTP 403 Forbidden - general access denied
    Http403Forbidden,

    /// Age-restricted content requiring login
    AgeRestricted,

    /// Private video requiring authorization
    PrivateVideo,

    /// Video deleted or unavailable
    VideoUnavailable,

    /// Geographic restriction
    GeoBlocked,

    /// Rate limiting (429 or similar)
    RateLimited,

    /// Bot detection triggered
    BotDetection,

    /// Network timeout or unreachable host
    NetworkTimeout,

    /// Requested format expression matched nothing
    FormatUnavailable,

    Unknown,
}

impl BlockingReason {
    /// Check if a cookies file might help
    pub fn cookies_might_help(&self) -> bool {
        matches!(
            self,
            Self::Http403Forbidden | Self::AgeRestricted | Self::PrivateVideo | Self::BotDetection
        )
    }

    /// Check if a proxy might help
    pub fn proxy_might_help(&self) -> bool {
        matches!(
            self,
            Self::GeoBlocked | Self::RateLimited | Self::NetworkTimeout
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::AgeRestricted => "Age-restricted content",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::GeoBlocked => "Geographic restriction",
            Self::RateLimited => "Rate limited",
            Self::BotDetection => "Bot detection triggered",
            Self::NetworkTimeout => "Network timeout",
            Self::FormatUnavailable => "Requested format not available",
            Self::Unknown => "Unknown failure",
        }
    }

    /// One-line suggestion appended to the printed diagnostic
    pub fn hint(&self) -> Option<String> {
        if *self == Self::VideoUnavailable {
            return Some(format!(
                "{}: check the video id, the video may have been removed",
                self.description()
            ));
        }
        if *self == Self::FormatUnavailable {
            return Some(format!(
                "{}: run in video mode without --resolution to list what is offered",
                self.description()
            ));
        }
        match (self.cookies_might_help(), self.proxy_might_help()) {
            (true, _) => Some(format!(
                "{}: supply a cookies file with --cookies",
                self.description()
            )),
            (false, true) => Some(format!(
                "{}: retry later or pass --proxy",
                self.description()
            )),
            _ => None,
        }
    }
}

/// Analyze yt-dlp error output and return the most specific reason
pub fn diagnose_error(error: &str) -> Option<BlockingReason> {
    if error.trim().is_empty() {
        return None;
    }

    lazy_static::lazy_static! {
        static ref HTTP_STATUS_RE: Regex = Regex::new(r"http error (\d{3})\b").unwrap();
    }

    let lower = error.to_lowercase();
    // yt-dlp reports statuses as "HTTP Error NNN"
    let http_status = HTTP_STATUS_RE
        .captures(&lower)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    if lower.contains("age-restricted")
        || lower.contains("sign in to confirm your age")
        || lower.contains("age_verification")
    {
        return Some(BlockingReason::AgeRestricted);
    }

    if lower.contains("private video")
        || lower.contains("video is private")
        || lower.contains("sign in if you've been granted access")
    {
        return Some(BlockingReason::PrivateVideo);
    }

    if lower.contains("video unavailable")
        || lower.contains("video has been removed")
        || lower.contains("this video is no longer available")
        || lower.contains("video is unavailable")
    {
        return Some(BlockingReason::VideoUnavailable);
    }

    if lower.contains("requested format is not available") {
        return Some(BlockingReason::FormatUnavailable);
    }

    if lower.contains("not available in your country")
        || lower.contains("blocked in your country")
        || lower.contains("geo restrict")
    {
        return Some(BlockingReason::GeoBlocked);
    }

    if http_status == Some("429")
        || lower.contains("rate limit")
        || lower.contains("too many requests")
    {
        return Some(BlockingReason::RateLimited);
    }

    if lower.contains("not a bot")
        || lower.contains("captcha")
        || lower.contains("unusual traffic")
    {
        return Some(BlockingReason::BotDetection);
    }

    if http_status == Some("403") || lower.contains("forbidden") {
        return Some(BlockingReason::Http403Forbidden);
    }

    if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection refused")
        || lower.contains("network unreachable")
    {
        return Some(BlockingReason::NetworkTimeout);
    }

    Some(BlockingReason::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_403_detection() {
        let error = "ERROR: HTTP Error 403: Forbidden";
        assert_eq!(diagnose_error(error), Some(BlockingReason::Http403Forbidden));
    }

    #[test]
    fn test_429_detection() {
        let error = "ERROR: unable to download video data: HTTP Error 429: Too Many Requests";
        assert_eq!(diagnose_error(error), Some(BlockingReason::RateLimited));
    }

    #[test]
    fn test_status_digits_in_video_id_are_ignored() {
        let error = "ERROR: [youtube] x403abcdefg: Something went wrong";
        assert_eq!(diagnose_error(error), Some(BlockingReason::Unknown));
        let error = "ERROR: [youtube] ab-429-cdef: Something went wrong";
        assert_eq!(diagnose_error(error), Some(BlockingReason::Unknown));
        assert!(BlockingReason::Unknown.hint().is_none());
    }

    #[test]
    fn test_age_restricted_detection() {
        let error = "ERROR: [youtube] abc: Sign in to confirm your age";
        assert_eq!(diagnose_error(error), Some(BlockingReason::AgeRestricted));
    }

    #[test]
    fn test_bot_detection() {
        let error = "ERROR: [youtube] abc: Sign in to confirm you're not a bot";
        assert_eq!(diagnose_error(error), Some(BlockingReason::BotDetection));
    }

    #[test]
    fn test_unavailable_detection() {
        let error = "ERROR: [youtube] zzzzzzzzzzz: Video unavailable";
        assert_eq!(diagnose_error(error), Some(BlockingReason::VideoUnavailable));
    }

    #[test]
    fn test_format_detection() {
        let error = "ERROR: [youtube] abc: Requested format is not available";
        assert_eq!(diagnose_error(error), Some(BlockingReason::FormatUnavailable));
    }

    #[test]
    fn test_timeout_detection() {
        let error = "yt-dlp timed out after 30s";
        assert_eq!(diagnose_error(error), Some(BlockingReason::NetworkTimeout));
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(diagnose_error("  \n"), None);
        assert_eq!(diagnose_error("something odd"), Some(BlockingReason::Unknown));
    }

    #[test]
    fn test_hints() {
        assert!(BlockingReason::AgeRestricted.hint().unwrap().contains("--cookies"));
        assert!(BlockingReason::RateLimited.hint().unwrap().contains("--proxy"));
        assert!(BlockingReason::Unknown.hint().is_none());
    }
}
