use scrapeprobe::error::AppResult;

fn main() -> AppResult<()> {
    scrapeprobe::run()
}
