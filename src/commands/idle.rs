use anyhow::Result;

pub fn cmd(owner: Option<&str>) -> Result<()> {
    super::switch::switch_to(owner, "idle")
}
