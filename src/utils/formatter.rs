// Formatters - 파일 크기, 개수, 진행률 포맷팅

/// 파일 크기를 읽기 쉬운 형식으로 포맷팅 (숫자와 단위 사이 공백)
///
/// # Examples
/// ```
/// use zip_manager::utils::formatter::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 B");
/// assert_eq!(format_file_size(512), "512 B");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(1_048_576), "1.0 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    }
}

/// 개수에 따라 단수/복수형 반환
///
/// # Examples
/// ```
/// use zip_manager::utils::formatter::pluralize;
///
/// assert_eq!(pluralize(1, "entry", "entries"), "1 entry");
/// assert_eq!(pluralize(3, "entry", "entries"), "3 entries");
/// ```
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// 다운로드 진행률 표시 (불명이면 "...")
pub fn format_progress(percentage: Option<u8>) -> String {
    match percentage {
        Some(value) => format!("{:>3}%", value.min(100)),
        None => " ...".to_string(),
    }
}

/// 고정 폭 진행 막대
pub fn progress_bar(percentage: Option<u8>, width: usize) -> String {
    let filled = percentage
        .map(|p| (p.min(100) as usize * width) / 100)
        .unwrap_or(0);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
