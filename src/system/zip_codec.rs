use crate::models::download::{CancelSignal, ProgressSink};
use crate::utils::error::{Result, ZipManagerError};
use std::io::{Cursor, Read, Write};
use std::sync::Arc;
use zip::write::SimpleFileOptions as ZipFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// 내보낼 zip 항목 (`data`가 None이면 디렉토리, 경로는 '/'로 끝남)
#[derive(Debug, Clone)]
pub struct ZipItem {
    pub path: String,
    pub data: Option<Arc<[u8]>>,
}

/// 압축 해제된 항목
#[derive(Debug, Clone)]
pub struct DecodedItem {
    pub segments: Vec<String>,
    pub data: Option<Vec<u8>>,
}

/// zip 생성
///
/// 항목마다 취소 신호를 확인하고 (처리 바이트, 전체 바이트) 진행률을 보고합니다.
pub fn encode(items: &[ZipItem], signal: &CancelSignal, progress: &ProgressSink) -> Result<Vec<u8>> {
    let total_bytes: u64 = items
        .iter()
        .filter_map(|item| item.data.as_ref())
        .map(|data| data.len() as u64)
        .sum();
    let mut bytes_processed = 0u64;
    progress.report(Some(bytes_processed), Some(total_bytes));

    let options = ZipFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for item in items {
        signal.check()?;
        match &item.data {
            None => writer.add_directory(item.path.as_str(), options)?,
            Some(data) => {
                writer.start_file(item.path.as_str(), options)?;
                writer.write_all(data)?;
                bytes_processed += data.len() as u64;
            }
        }
        progress.report(Some(bytes_processed), Some(total_bytes));
    }

    signal.check()?;
    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// 헤더의 크기 정보로 미리 잡는 버퍼 상한
const MAX_PREALLOCATION: u64 = 1 << 20;

/// zip 해제 (저장 순서 유지)
pub fn decode(data: &[u8]) -> Result<Vec<DecodedItem>> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let mut items = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let segments = split_entry_path(file.name())?;
        if segments.is_empty() {
            continue;
        }
        let data = if file.is_dir() {
            None
        } else {
            let mut buffer = Vec::with_capacity(initial_capacity(file.size()));
            file.read_to_end(&mut buffer)?;
            Some(buffer)
        };
        items.push(DecodedItem { segments, data });
    }

    Ok(items)
}

/// 압축 해제 버퍼 초기 용량 (헤더 값은 신뢰하지 않음)
fn initial_capacity(declared_size: u64) -> usize {
    declared_size.min(MAX_PREALLOCATION) as usize
}

fn split_entry_path(path: &str) -> Result<Vec<String>> {
    let mut segments = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(ZipManagerError::InvalidName {
                    name: path.to_string(),
                })
            }
            name => segments.push(name.to_string()),
        }
    }
    Ok(segments)
}
