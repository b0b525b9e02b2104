fn main() {
    chat_widget::init();
}
