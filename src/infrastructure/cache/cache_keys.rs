pub fn view_key(path: &str, user_id: &str) -> String {
    format!("view:{}:{}", path, user_id)
}
