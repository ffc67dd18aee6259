use tokio::io::AsyncReadExt;

/// Location value that selects standard input instead of a file.
pub(crate) const STDIN_LOCATION: &str = "-";

pub(crate) async fn read_stdin() -> std::io::Result<Vec<u8>> {
  let mut buffer = Vec::new();
  tokio::io::stdin().read_to_end(&mut buffer).await?;
  Ok(buffer)
}
