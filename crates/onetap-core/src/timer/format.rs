/// Render whole seconds as `mm:ss`. Minutes keep counting past 59.
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
