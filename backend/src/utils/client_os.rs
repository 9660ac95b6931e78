//! Best-effort client OS detection for labelling login sessions.
//!
//! Prefers UA client hints (`sec-ch-ua-platform`), falls back to classic
//! `User-Agent` sniffing. Produces labels such as "Windows 11", "Android 14",
//! "macOS 14.5", "Linux", or "Unknown".

use axum::http::HeaderMap;

pub fn detect(headers: &HeaderMap) -> String {
    let platform = header_value(headers, "sec-ch-ua-platform").map(unquote);
    let version = header_value(headers, "sec-ch-ua-platform-version")
        .map(unquote)
        .unwrap_or_default();

    if let Some(platform) = platform.filter(|p| !p.is_empty()) {
        if platform.eq_ignore_ascii_case("Windows") {
            // Chromium reports Windows 11 as platform version 13+.
            let major = version
                .split('.')
                .next()
                .and_then(|v| v.parse::<i32>().ok())
                .unwrap_or(-1);
            let name = if major >= 13 {
                "Windows 11"
            } else if major > 0 {
                "Windows 10"
            } else {
                "Windows"
            };
            return if version.is_empty() {
                name.to_string()
            } else {
                format!("{} {}", name, version)
            };
        }
        return if version.is_empty() {
            platform
        } else {
            format!("{} {}", platform, version)
        };
    }

    let Some(ua) = header_value(headers, "user-agent") else {
        return "Unknown".to_string();
    };

    detect_from_user_agent(&ua)
}

fn detect_from_user_agent(ua: &str) -> String {
    // Modern iPads report a desktop-Mac UA plus "Mobile".
    if ua.contains("Macintosh") && ua.contains("Mobile") {
        return "iPadOS".to_string();
    }
    if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
        if let Some(version) = version_after(ua, "OS ", |c: char| c.is_ascii_digit() || c == '_') {
            return format!("iOS {}", version.replace('_', "."));
        }
        return "iOS".to_string();
    }
    if let Some(version) = version_after(ua, "Android ", |c: char| c.is_ascii_digit() || c == '.') {
        return format!("Android {}", version);
    }
    if let Some(nt) = version_after(ua, "Windows NT ", |c: char| c.is_ascii_digit() || c == '.') {
        return windows_name(&nt).to_string();
    }
    if let Some(version) = version_after(ua, "Mac OS X ", |c: char| {
        c.is_ascii_digit() || c == '_' || c == '.'
    }) {
        return format!("macOS {}", version.replace('_', "."));
    }
    if ua.contains("CrOS ") {
        return "ChromeOS".to_string();
    }
    if ua.contains("Linux") {
        return "Linux".to_string();
    }
    "Unknown".to_string()
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn unquote(value: String) -> String {
    let trimmed = value.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed)
        .to_string()
}

/// Returns the run of `allowed` characters directly after `marker`.
fn version_after(haystack: &str, marker: &str, allowed: fn(char) -> bool) -> Option<String> {
    let start = haystack.find(marker)? + marker.len();
    let version: String = haystack[start..].chars().take_while(|c| allowed(*c)).collect();
    if version.is_empty() {
        None
    } else {
        Some(version)
    }
}

fn windows_name(nt_version: &str) -> &'static str {
    match nt_version {
        // NT 10.0 covers both; UA-CH is needed to tell them apart.
        "10.0" => "Windows 10/11",
        "6.3" => "Windows 8.1",
        "6.2" => "Windows 8",
        "6.1" => "Windows 7",
        "6.0" => "Windows Vista",
        "5.1" => "Windows XP",
        _ => "Windows",
    }
}
