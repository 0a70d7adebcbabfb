fn main() {
    lifeline_lib::run()
}
