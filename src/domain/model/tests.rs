// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::model::*;

    #[test]
    fn test_time_spec_from_seconds() {
        let time = TimeSpec::from_seconds(3661.5);
        assert_eq!(time.seconds, 3661.5);
    }

    #[test]
    fn test_time_spec_from_components() {
        let time = TimeSpec::from_components(1, 2, 3, 500);
        assert_eq!(time.seconds, 3723.5);
    }

    #[test]
    fn test_time_spec_parse_seconds() {
        let time = TimeSpec::parse("123.456").unwrap();
        assert_eq!(time.seconds, 123.456);
    }

    #[test]
    fn test_time_spec_parse_mm_ss() {
        let time = TimeSpec::parse("01:30.5").unwrap();
        assert_eq!(time.seconds, 90.5);
    }

    #[test]
    fn test_time_spec_parse_hh_mm_ss() {
        let time = TimeSpec::parse("01:02:03.456").unwrap();
        assert_eq!(time.seconds, 3723.456);
    }

    #[test]
    fn test_time_spec_parse_invalid() {
        assert!(TimeSpec::parse("invalid").is_err());
        assert!(TimeSpec::parse("00:61").is_err()); // Invalid seconds
        assert!(TimeSpec::parse("1:60:00").is_err()); // Invalid minutes
        assert!(TimeSpec::parse("-10").is_err()); // Negative time
    }

    #[test]
    fn test_time_spec_display() {
        let time = TimeSpec::from_components(1, 2, 3, 456);
        assert_eq!(format!("{}", time), "1:02:03.456");

        let time_no_hours = TimeSpec::from_components(0, 2, 3, 456);
        assert_eq!(format!("{}", time_no_hours), "2:03.456");
    }

    #[test]
    fn test_sentence_creation() {
        let sentence = Sentence::new("hello world", 1.0, 2.5).unwrap();
        assert_eq!(sentence.text, "hello world");
        assert_eq!(sentence.duration(), 1.5);
        assert_eq!(sentence.confidence, 1.0);
        assert!(sentence.speaker.is_none());
    }

    #[test]
    fn test_sentence_invalid_range() {
        assert!(Sentence::new("backwards", 5.0, 2.0).is_err());
    }

    #[test]
    fn test_sentence_overlap() {
        let sentence = Sentence::new("overlap", 10.0, 20.0).unwrap();
        assert_eq!(sentence.overlap_with(15.0, 25.0), 5.0);
        assert_eq!(sentence.overlap_with(0.0, 5.0), 0.0);
        assert_eq!(sentence.overlap_with(12.0, 14.0), 2.0);
    }

    #[test]
    fn test_transcript_full_text_and_duration() {
        let mut transcript = Transcript::new("video.mp4", "en");
        transcript
            .sentences
            .push(Sentence::new("first", 0.0, 1.0).unwrap());
        transcript
            .sentences
            .push(Sentence::new("second", 1.5, 3.0).unwrap());

        assert_eq!(transcript.full_text(), "first second");
        assert_eq!(transcript.duration(), 3.0);
    }

    #[test]
    fn test_transcript_speakers_in_order() {
        let mut transcript = Transcript::new("video.mp4", "en");
        let mut a = Sentence::new("a", 0.0, 1.0).unwrap();
        a.speaker = Some("spk1".to_string());
        let mut b = Sentence::new("b", 1.0, 2.0).unwrap();
        b.speaker = Some("spk0".to_string());
        let mut c = Sentence::new("c", 2.0, 3.0).unwrap();
        c.speaker = Some("spk1".to_string());
        transcript.sentences.extend([a, b, c]);

        assert_eq!(transcript.speakers(), vec!["spk1", "spk0"]);
    }

    #[test]
    fn test_transcript_json_round_trip() {
        let mut transcript = Transcript::new("video.mp4", "en");
        let mut sentence = Sentence::new("hello", 0.5, 2.0).unwrap();
        sentence.speaker = Some("spk0".to_string());
        transcript.sentences.push(sentence);

        let json = serde_json::to_string(&transcript).unwrap();
        let parsed: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.sentences, transcript.sentences);
        assert_eq!(parsed.language, "en");
    }

    #[test]
    fn test_clip_segment_creation() {
        let segment = ClipSegment::new(10.0, 25.0, "highlight").unwrap();
        assert_eq!(segment.duration(), 15.0);
        assert_eq!(segment.score, 5);
    }

    #[test]
    fn test_clip_segment_invalid() {
        assert!(ClipSegment::new(10.0, 10.0, "zero length").is_err());
        assert!(ClipSegment::new(-1.0, 5.0, "negative start").is_err());
    }

    #[test]
    fn test_clip_plan_sorts_segments() {
        let plan = ClipPlan::new(
            "video.mp4",
            vec![
                ClipSegment::new(30.0, 40.0, "late").unwrap(),
                ClipSegment::new(5.0, 10.0, "early").unwrap(),
            ],
        );

        assert_eq!(plan.segments[0].description, "early");
        assert_eq!(plan.total_duration(), 15.0);
    }

    #[test]
    fn test_clip_plan_validate_against_duration() {
        let mut plan = ClipPlan::new(
            "video.mp4",
            vec![
                ClipSegment::new(5.0, 10.0, "ok").unwrap(),
                ClipSegment::new(55.0, 65.0, "overruns").unwrap(),
                ClipSegment::new(70.0, 80.0, "past end").unwrap(),
            ],
        );

        let dropped = plan.validate_against(60.0);
        assert_eq!(dropped, 1);
        assert_eq!(plan.segments.len(), 2);
        assert_eq!(plan.segments[1].end_time, 60.0);
    }
}
