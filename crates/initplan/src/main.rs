fn main() -> anyhow::Result<()> {
    initplan_lib::main()
}
