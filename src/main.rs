fn main() -> std::process::ExitCode {
    todo_board_lib::run()
}
