use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use super::pipe::PipeWriter;
use crate::core::Encoder;
use crate::error::{Error, Result};

const COPY_BUF_SIZE: usize = 8 * 1024;

/// Frame `source` as one multipart file field and write it into the pipe.
///
/// At most `size` bytes are read from `source`. Fewer is a
/// [`Error::ShortRead`] and the closing delimiter is withheld, so the body
/// ends early instead of looking complete. The writer is closed on every
/// return path.
///
/// Returns the number of payload bytes written.
pub async fn produce<R>(
    mut writer: PipeWriter,
    encoder: &Encoder,
    file_name: &str,
    source: R,
    size: u64,
) -> Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut source = source.take(size);

    write(&mut writer, &encoder.head(file_name)).await?;

    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut written = 0u64;
    loop {
        let n = source.read(&mut buf).await.map_err(Error::SourceRead)?;
        if n == 0 {
            break;
        }
        write(&mut writer, &buf[..n]).await?;
        written += n as u64;
    }

    if written != size {
        return Err(Error::ShortRead {
            expected: size,
            actual:   written,
        });
    }

    write(&mut writer, &encoder.tail()).await?;
    writer.shutdown().await.map_err(|e| {
        tracing::debug!(error = %e, "pipe shutdown failed");
        Error::PipeClosed
    })?;

    Ok(written)
}

async fn write(writer: &mut PipeWriter, bytes: &[u8]) -> Result<()> {
    writer.write_all(bytes).await.map_err(|e| {
        tracing::debug!(error = %e, "transfer pipe rejected write");
        Error::PipeClosed
    })
}
