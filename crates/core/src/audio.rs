//! Audio helpers
//!
//! The synthesis collaborator caps input at a few hundred characters per
//! call, so long answers come back as several independent WAV payloads.
//! `concat_wav` splices them into one continuous file instead of dropping
//! everything after the first chunk.

use std::io::Cursor;

use crate::error::{Error, Result};

/// Concatenate WAV payloads into a single WAV.
///
/// All chunks must share the same sample format; the spec of the first
/// chunk wins and a mismatching chunk is rejected rather than resampled.
pub fn concat_wav(chunks: &[Vec<u8>]) -> Result<Vec<u8>> {
    match chunks {
        [] => Err(Error::Synthesis("no audio chunks to join".into())),
        [only] => Ok(only.clone()),
        _ => {
            let mut spec: Option<hound::WavSpec> = None;
            let mut samples: Vec<i16> = Vec::new();

            for (i, chunk) in chunks.iter().enumerate() {
                let mut reader = hound::WavReader::new(Cursor::new(chunk))
                    .map_err(|e| Error::Synthesis(format!("chunk {i} is not valid WAV: {e}")))?;
                let chunk_spec = reader.spec();

                match spec {
                    None => spec = Some(chunk_spec),
                    Some(first) if first != chunk_spec => {
                        return Err(Error::Synthesis(format!(
                            "chunk {i} format mismatch: {:?} vs {:?}",
                            chunk_spec, first
                        )));
                    }
                    Some(_) => {}
                }

                for sample in reader.samples::<i16>() {
                    samples.push(
                        sample.map_err(|e| Error::Synthesis(format!("chunk {i} decode: {e}")))?,
                    );
                }
            }

            let spec = spec.ok_or_else(|| Error::Synthesis("no decodable chunks".into()))?;
            let mut out = Cursor::new(Vec::new());
            {
                let mut writer = hound::WavWriter::new(&mut out, spec)
                    .map_err(|e| Error::Synthesis(format!("wav write: {e}")))?;
                for s in samples {
                    writer
                        .write_sample(s)
                        .map_err(|e| Error::Synthesis(format!("wav write: {e}")))?;
                }
                writer
                    .finalize()
                    .map_err(|e| Error::Synthesis(format!("wav finalize: {e}")))?;
            }
            Ok(out.into_inner())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_with_samples(samples: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut buf, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_concat_joins_all_samples_in_order() {
        let a = wav_with_samples(&[1, 2, 3]);
        let b = wav_with_samples(&[4, 5]);
        let joined = concat_wav(&[a, b]).unwrap();

        let mut reader = hound::WavReader::new(Cursor::new(&joined)).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_concat_single_chunk_is_passthrough() {
        let a = wav_with_samples(&[7, 8]);
        let joined = concat_wav(&[a.clone()]).unwrap();
        assert_eq!(joined, a);
    }

    #[test]
    fn test_concat_rejects_empty_and_garbage() {
        assert!(concat_wav(&[]).is_err());
        let a = wav_with_samples(&[1]);
        assert!(concat_wav(&[a, b"not a wav".to_vec()]).is_err());
    }
}
