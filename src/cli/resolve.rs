use crate::cli::{load_config, KindArg, ResolveArgs};
use crate::provider::create_providers;
use crate::resolver::{CodeKind, CodeResolver};
use std::path::Path;

pub async fn execute(args: ResolveArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let kind = match args.kind {
        KindArg::City => CodeKind::City,
        KindArg::Airport => CodeKind::Airport,
    };

    let resolver = CodeResolver::new(create_providers(&config)?.locations);

    match resolver.resolve(kind, &args.place).await {
        Some(code) => {
            println!("{}", code);
            Ok(())
        }
        None => anyhow::bail!(
            "Couldn't resolve a {} code for \"{}\". Try a more specific name like \"Paris, FR\".",
            kind,
            args.place
        ),
    }
}
