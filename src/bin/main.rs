use anyhow::Result;

fn main() -> Result<()> {
    netledger::start_netledger()
}
