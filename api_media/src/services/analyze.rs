use common::error::Res;
use providers::ports::{EmailSender, ObjectStorage, OutboundEmail, Summarizer, Transcriber};

/// How much of the summary the analyze response previews.
const PREVIEW_CHARS: usize = 300;

#[derive(Debug)]
pub struct AnalyzeOutcome {
    pub summary_preview: String,
}

/// Runs the lecture pipeline: fetch the audio from storage, transcribe it,
/// summarize the transcript, email the summary. Strictly sequential; the
/// first failing stage aborts the run and nothing is retried or persisted.
pub async fn run(
    storage: &dyn ObjectStorage,
    transcriber: &dyn Transcriber,
    summarizer: &dyn Summarizer,
    mailer: &dyn EmailSender,
    file_name: &str,
    email: &str,
) -> Res<AnalyzeOutcome> {
    let audio = storage.fetch(file_name.to_string()).await?;
    log::info!("Fetched {} ({} bytes) for analysis", file_name, audio.len());

    let transcript = transcriber.transcribe(file_name.to_string(), audio).await?;
    let summary = summarizer.summarize(transcript).await?;

    mailer
        .send_html(OutboundEmail {
            to: email.to_string(),
            subject: format!("Summary of {}", file_name),
            html: render_summary_html(file_name, &summary),
        })
        .await?;
    log::info!("Emailed summary of {} to {}", file_name, email);

    Ok(AnalyzeOutcome {
        summary_preview: preview(&summary, PREVIEW_CHARS),
    })
}

/// Truncates to at most `max_chars` characters without splitting a char.
fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn render_summary_html(file_name: &str, summary: &str) -> String {
    format!(
        "<div><h2>Summary of {}</h2><p>{}</p></div>",
        file_name,
        summary.replace('\n', "<br/>")
    )
}

#[cfg(test)]
mod tests {
    use common::error::AppError;
    use mockall::Sequence;
    use providers::ports::{
        MockEmailSender, MockObjectStorage, MockSummarizer, MockTranscriber,
    };

    use super::*;

    #[test]
    fn preview_respects_char_boundaries() {
        let long = "a".repeat(350);
        assert_eq!(preview(&long, 300).len(), 300);

        let accented = "é".repeat(10);
        assert_eq!(preview(&accented, 4), "éééé");

        assert_eq!(preview("short", 300), "short");
    }

    #[actix_web::test]
    async fn stages_run_in_order_and_email_carries_the_summary() {
        let mut seq = Sequence::new();

        let mut storage = MockObjectStorage::new();
        storage
            .expect_fetch()
            .withf(|file_name| file_name == "lecture1.mp3")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(b"ID3fakeaudio".to_vec()));

        let mut transcriber = MockTranscriber::new();
        transcriber
            .expect_transcribe()
            .withf(|file_name, audio| file_name == "lecture1.mp3" && audio == b"ID3fakeaudio")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("Today we covered sorting.".to_string()));

        let mut summarizer = MockSummarizer::new();
        summarizer
            .expect_summarize()
            .withf(|transcript| transcript.contains("sorting"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("- Sorting algorithms\n- Quicksort".to_string()));

        let mut mailer = MockEmailSender::new();
        mailer
            .expect_send_html()
            .withf(|email| {
                email.to == "student@example.com"
                    && email.subject.contains("lecture1.mp3")
                    && email.html.contains("Quicksort")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let outcome = run(
            &storage,
            &transcriber,
            &summarizer,
            &mailer,
            "lecture1.mp3",
            "student@example.com",
        )
        .await
        .unwrap();

        assert!(outcome.summary_preview.starts_with("- Sorting"));
    }

    #[actix_web::test]
    async fn failed_transcription_short_circuits_the_pipeline() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_fetch()
            .returning(|_| Ok(b"ID3fakeaudio".to_vec()));

        let mut transcriber = MockTranscriber::new();
        transcriber
            .expect_transcribe()
            .returning(|_, _| Err(AppError::Upstream("transcription failed: 400".to_string())));

        let mut summarizer = MockSummarizer::new();
        summarizer.expect_summarize().times(0);
        let mut mailer = MockEmailSender::new();
        mailer.expect_send_html().times(0);

        let err = run(
            &storage,
            &transcriber,
            &summarizer,
            &mailer,
            "lecture1.mp3",
            "student@example.com",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[actix_web::test]
    async fn long_summary_is_previewed_to_300_chars() {
        let mut storage = MockObjectStorage::new();
        storage.expect_fetch().returning(|_| Ok(vec![1, 2, 3]));
        let mut transcriber = MockTranscriber::new();
        transcriber
            .expect_transcribe()
            .returning(|_, _| Ok("transcript".to_string()));
        let mut summarizer = MockSummarizer::new();
        summarizer
            .expect_summarize()
            .returning(|_| Ok("s".repeat(1000)));
        let mut mailer = MockEmailSender::new();
        mailer.expect_send_html().returning(|_| Ok(()));

        let outcome = run(
            &storage,
            &transcriber,
            &summarizer,
            &mailer,
            "lecture1.mp3",
            "student@example.com",
        )
        .await
        .unwrap();

        assert_eq!(outcome.summary_preview.chars().count(), 300);
    }
}
