use std::io::Cursor;

#[derive(Debug, thiserror::Error)]
pub enum CryError {
    #[error("no audio output: {0}")]
    Output(#[from] rodio::StreamError),
    #[error("could not open sink: {0}")]
    Sink(#[from] rodio::PlayError),
    #[error("could not decode cry: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Plays an Ogg Vorbis cry on the default output device. Blocks until done.
pub fn play_cry(bytes: Vec<u8>) -> Result<(), CryError> {
    let (_stream, handle) = rodio::OutputStream::try_default()?;
    let sink = rodio::Sink::try_new(&handle)?;
    sink.append(rodio::Decoder::new(Cursor::new(bytes))?);
    sink.sleep_until_end();
    tracing::debug!("cry finished");
    Ok(())
}
