// src/downloader/file_writer.rs

use crate::{client::RobustClient, constants, error::*};
use futures::{Stream, StreamExt};
use log::{debug, error};
use reqwest::header::HeaderMap;
use std::{
    io::Write,
    path::Path,
    pin::pin,
};
use tempfile::NamedTempFile;
use url::Url;

/// 在目标文件所在目录创建临时文件，保证最后的 rename 不跨文件系统
fn temp_file_beside(destination: &Path) -> AppResult<NamedTempFile> {
    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(tempfile::Builder::new()
        .prefix(".learning-dl-")
        .suffix(".part")
        .tempfile_in(dir)?)
}

/// 把字节流逐块写入 `destination`。
///
/// 数据先写进同目录下的临时文件，完整写完后才重命名为目标文件；
/// 中途出错时临时文件随 drop 删除，目标路径上不会留下不完整的文件。
pub async fn write_stream<S, B, E>(stream: S, destination: &Path) -> AppResult<u64>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    AppError: From<E>,
{
    let mut stream = pin!(stream);
    let mut temp = temp_file_beside(destination)?;
    let mut written = 0u64;

    let copy_result: AppResult<()> = async {
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for piece in chunk.as_ref().chunks(constants::STREAM_CHUNK_SIZE) {
                temp.write_all(piece)?;
                written += piece.len() as u64;
            }
        }
        temp.flush()?;
        Ok(())
    }
    .await;

    if let Err(e) = copy_result {
        error!("[!] Error while downloading '{}': {}", destination.display(), e);
        // NamedTempFile 在 drop 时删除
        drop(temp);
        return Err(e);
    }

    temp.persist(destination)?;
    debug!("已写入 {} 字节到 '{}'", written, destination.display());
    Ok(written)
}

/// 下载远程资源并流式写入磁盘，不会把整个响应体读入内存
pub async fn download_stream(
    client: &RobustClient,
    url: &str,
    headers: &HeaderMap,
    destination: &Path,
) -> AppResult<u64> {
    let res = client.get(Url::parse(url)?, headers).await?;
    write_stream(res.bytes_stream(), destination).await
}

/// 整体写入一段文本，同样经由临时文件
pub fn write_text(content: &str, destination: &Path) -> AppResult<()> {
    let mut temp = temp_file_beside(destination)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    temp.persist(destination)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::{fs, io};

    fn dir_entries(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_write_stream_persists_all_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("01 - Intro.mp4");
        let chunks: Vec<Result<Vec<u8>, io::Error>> =
            vec![Ok(b"hello ".to_vec()), Ok(b"world".to_vec())];

        let written = write_stream(stream::iter(chunks), &dest).await.unwrap();

        assert_eq!(written, 11);
        assert_eq!(fs::read(&dest).unwrap(), b"hello world");
        assert_eq!(dir_entries(dir.path()), vec!["01 - Intro.mp4".to_string()]);
    }

    #[tokio::test]
    async fn test_write_stream_removes_partial_file_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("02 - Broken.mp4");
        let chunks: Vec<Result<Vec<u8>, io::Error>> = vec![
            Ok(vec![7u8; 4096]),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection dropped")),
            Ok(vec![8u8; 16]),
        ];

        let result = write_stream(stream::iter(chunks), &dest).await;

        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(!dest.exists());
        assert!(dir_entries(dir.path()).is_empty(), "临时文件应被清理");
    }

    #[test]
    fn test_write_text() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("01 - Intro.srt");
        write_text("1\n00:00:00,000 --> 00:00:01,000\nA\n\n", &dest).unwrap();
        assert!(fs::read_to_string(&dest).unwrap().starts_with("1\n"));
    }
}
