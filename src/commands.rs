use std::io::{self, BufRead, Write};

use colored::Colorize;
use hoard_client::{Api, Hoard, HoardEvent, ItemChange, ListStore};
use hoard_core::{
    Flash, FlashKind, Game, ItemAttributes, List, ListItem, PrimaryKey, UpdatedGame,
};
use log::debug;

use crate::cli::{CliError, Commands, GameCommand, ItemCommand, ListCommand, ListScope};

pub async fn run<A>(hoard: &Hoard<A>, command: Commands) -> Result<(), CliError>
where
    A: Api,
{
    let result = dispatch(hoard, command).await;
    print_events(hoard);

    result
}

async fn dispatch<A>(hoard: &Hoard<A>, command: Commands) -> Result<(), CliError>
where
    A: Api,
{
    match command {
        Commands::Profile => {
            let profile = hoard.fetch_profile().await?;

            println!("{} <{}>", profile.name.as_deref().unwrap_or(&profile.uid), profile.email);
        }
        Commands::Games { command } => run_games(hoard, command).await?,
        Commands::Lists { scope, command } => {
            let (store, game_id) = open_store(hoard, &scope).await?;
            run_lists(&store, game_id, command).await?;
        }
        Commands::Items { scope, command } => {
            let (store, _) = open_store(hoard, &scope).await?;
            run_items(&store, command).await?;
        }
    }

    Ok(())
}

async fn run_games<A>(hoard: &Hoard<A>, command: GameCommand) -> Result<(), CliError>
where
    A: Api,
{
    match command {
        GameCommand::List => {
            for game in hoard.games.fetch_games().await? {
                print_game(&game);
            }
        }
        GameCommand::Create { name, description } => {
            let game = hoard.games.create_game(&name, description.as_deref()).await?;
            print_game(&game);
        }
        GameCommand::Rename { game_id, name } => {
            let updated_game = UpdatedGame {
                name: Some(name),
                description: None,
            };

            let game = hoard.games.update_game(game_id, &updated_game).await?;
            print_game(&game);
        }
        GameCommand::Delete { game_id } => hoard.games.destroy_game(game_id).await?,
    }

    Ok(())
}

async fn run_lists<A>(
    store: &ListStore<A>,
    game_id: PrimaryKey,
    command: ListCommand,
) -> Result<(), CliError>
where
    A: Api,
{
    match command {
        ListCommand::Show => {}
        ListCommand::Create { title } => {
            store.create_list(game_id, &title).await?;
        }
        ListCommand::Rename { list_id, title } => {
            store.update_list(list_id, &title).await?;
        }
        ListCommand::Delete { list_id } => store.destroy_list(list_id).await?,
    }

    for list in store.lists() {
        print_list(&list);
    }

    debug!("Showed {} lists of game {}", store.kind(), game_id);
    Ok(())
}

async fn run_items<A>(store: &ListStore<A>, command: ItemCommand) -> Result<(), CliError>
where
    A: Api,
{
    match command {
        ItemCommand::Add {
            list_id,
            description,
            quantity,
            notes,
            unit_weight,
        } => {
            let mut attributes = ItemAttributes::new(description, quantity);
            if let Some(notes) = notes {
                attributes = attributes.with_notes(notes);
            }
            if let Some(unit_weight) = unit_weight {
                attributes = attributes.with_unit_weight(unit_weight);
            }

            let item = store.create_list_item(list_id, &attributes).await?;
            print_item(&item);
        }
        ItemCommand::Edit {
            item_id,
            quantity,
            notes,
            unit_weight,
        } => {
            let attributes = ItemAttributes {
                description: None,
                quantity,
                notes,
                unit_weight,
            };

            if attributes == ItemAttributes::default() {
                return Err(CliError::NothingToEdit);
            }

            let item = store.update_list_item(item_id, &attributes).await?;
            print_item(&item);
        }
        ItemCommand::Inc { item_id } => {
            let item = store.increment_item(item_id).await?;
            print_item(&item);
        }
        ItemCommand::Dec { item_id, yes } => {
            let change = store
                .decrement_item(item_id, |item| yes || confirm_removal(item))
                .await?;

            match change {
                ItemChange::Updated(item) => print_item(&item),
                ItemChange::Destroyed => println!("Deleted item {}", item_id),
                ItemChange::Kept => {}
            }
        }
        ItemCommand::Delete { item_id } => {
            let item = store.destroy_list_item(item_id).await?;
            println!("Deleted {}", item.description);
        }
    }

    Ok(())
}

/// Fetches the games to find the active one, then the lists of that game.
async fn open_store<A>(
    hoard: &Hoard<A>,
    scope: &ListScope,
) -> Result<(ListStore<A>, PrimaryKey), CliError>
where
    A: Api,
{
    hoard.games.fetch_games().await?;

    let query = scope.game.map(|id| format!("game_id={}", id));
    let game_id = hoard
        .games
        .active_game_id(query.as_deref())
        .ok_or(CliError::NoGames)?;

    let store = hoard.list_store(scope.kind);
    store.fetch_lists(game_id).await?;

    Ok((store, game_id))
}

fn confirm_removal(item: &ListItem) -> bool {
    print!(
        "That will leave no {}. Delete it instead? [y/N] ",
        item.description.bold()
    );

    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }

    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_events<A>(hoard: &Hoard<A>)
where
    A: Api,
{
    for event in hoard.drain_events() {
        match event {
            HoardEvent::Flash(flash) => print_flash(&flash),
            HoardEvent::Redirect { to } => {
                eprintln!("{} {}", "Signed out, sign in again at".yellow(), to);
            }
            other => debug!("{:?}", other),
        }
    }
}

fn print_flash(flash: &Flash) {
    let header = flash.header.as_deref().unwrap_or_default();

    match flash.kind {
        FlashKind::Info => {
            if !header.is_empty() {
                eprintln!("{}", header.blue());
            }
            for message in &flash.messages {
                eprintln!("{}", message.blue());
            }
        }
        FlashKind::Error => {
            if !header.is_empty() {
                eprintln!("{}", header.red().bold());
            }
            for message in &flash.messages {
                eprintln!("  {}", message.red());
            }
        }
    }
}

fn print_game(game: &Game) {
    println!("{:>5}  {}", game.id.to_string().bright_black(), game.name.bold());

    if let Some(description) = &game.description {
        println!("       {}", description);
    }
}

fn print_list(list: &List) {
    let title = if list.aggregate {
        list.title.bold().underline()
    } else {
        list.title.bold()
    };

    println!("{:>5}  {}", list.id.to_string().bright_black(), title);

    for item in &list.list_items {
        print!("  ");
        print_item(item);
    }
}

fn print_item(item: &ListItem) {
    let mut line = format!(
        "{:>5}  {} x{}",
        item.id.to_string().bright_black(),
        item.description,
        item.quantity
    );

    if let Some(unit_weight) = item.unit_weight {
        line.push_str(&format!(" ({} each)", unit_weight));
    }
    if let Some(notes) = &item.notes {
        line.push_str(&format!(" - {}", notes.italic()));
    }

    println!("{}", line);
}
