/// Format the gap between two unix-second timestamps as a coarse relative
/// phrase ("5 minutes ago"). `then` later than `now` collapses to "just now".
pub fn time_ago(now_secs: u64, then_secs: u64) -> String {
    let Some(elapsed) = now_secs.checked_sub(then_secs) else {
        return "just now".to_owned();
    };

    let seconds = elapsed;
    if seconds < 60 {
        return unit(seconds, "second");
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return unit(minutes, "minute");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return unit(hours, "hour");
    }

    let days = hours / 24;
    if days < 7 {
        return unit(days, "day");
    }

    let weeks = days / 7;
    if weeks < 5 {
        return unit(weeks, "week");
    }

    let months = days / 30;
    if months < 12 {
        return unit(months, "month");
    }

    unit(days / 365, "year")
}

fn unit(count: u64, name: &str) -> String {
    if count == 1 {
        format!("1 {name} ago")
    } else {
        format!("{count} {name}s ago")
    }
}

/// Cut text to at most `max_chars` characters, appending an ellipsis when
/// anything was removed. Counts characters, not bytes, so multi-byte input
/// never splits mid-character.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_owned(),
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
    }
}

#[cfg(test)]
mod tests {
    use super::{time_ago, truncate_text};

    #[test]
    fn relative_times_pick_the_right_unit() {
        assert_eq!(time_ago(100, 100), "0 seconds ago");
        assert_eq!(time_ago(100, 99), "1 second ago");
        assert_eq!(time_ago(100, 41), "59 seconds ago");
        assert_eq!(time_ago(200, 100), "1 minute ago");
        assert_eq!(time_ago(7_200, 0), "2 hours ago");
        assert_eq!(time_ago(86_400, 0), "1 day ago");
        assert_eq!(time_ago(86_400 * 14, 0), "2 weeks ago");
        assert_eq!(time_ago(86_400 * 60, 0), "2 months ago");
        assert_eq!(time_ago(86_400 * 800, 0), "2 years ago");
    }

    #[test]
    fn future_timestamps_collapse_to_just_now() {
        assert_eq!(time_ago(100, 200), "just now");
    }

    #[test]
    fn truncation_spares_short_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn truncation_appends_ellipsis() {
        assert_eq!(truncate_text("hello world", 5), "hello...");
    }

    #[test]
    fn truncation_is_character_aware() {
        assert_eq!(truncate_text("héllö wörld", 5), "héllö...");
    }
}
