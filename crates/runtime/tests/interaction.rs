//! End-to-end interaction scenarios over a real data directory and a mock
//! engine boundary.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use runtime::{
    ActorId, CommandOrigin, EngineBridge, EntityHandle, EntitySpec, NpcError, NpcService,
    PlaceholderResolver, PlayerGateway, ResolvedDialog, RuntimeConfig, SpawnError,
};
use uuid::Uuid;

/// Engine mock: mints handles, tracks alive entities, records effects.
struct MockEngine {
    worlds: Vec<String>,
    next_handle: AtomicU64,
    alive: Mutex<Vec<u64>>,
    despawned: Mutex<Vec<u64>>,
    emotes: Mutex<Vec<(u64, String)>>,
    faced: Mutex<Vec<u64>>,
    /// (skin id, had cape) per spawn, in order.
    spawned_skins: Mutex<Vec<(String, bool)>>,
}

impl MockEngine {
    fn new(worlds: &[&str]) -> Self {
        Self {
            worlds: worlds.iter().map(|world| (*world).to_owned()).collect(),
            next_handle: AtomicU64::new(1),
            alive: Mutex::new(Vec::new()),
            despawned: Mutex::new(Vec::new()),
            emotes: Mutex::new(Vec::new()),
            faced: Mutex::new(Vec::new()),
            spawned_skins: Mutex::new(Vec::new()),
        }
    }
}

impl EngineBridge for MockEngine {
    fn spawn_entity(&self, spec: &EntitySpec) -> Result<EntityHandle, SpawnError> {
        if !self.worlds.contains(&spec.world) {
            return Err(SpawnError::UnknownWorld(spec.world.clone()));
        }
        let raw = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.alive.lock().unwrap().push(raw);
        self.spawned_skins
            .lock()
            .unwrap()
            .push((spec.skin.id().to_owned(), spec.skin.cape().is_some()));
        Ok(EntityHandle::new(raw))
    }

    fn despawn_entity(&self, handle: EntityHandle) {
        self.alive.lock().unwrap().retain(|raw| *raw != handle.raw());
        self.despawned.lock().unwrap().push(handle.raw());
    }

    fn face_viewers(&self, handle: EntityHandle) {
        self.faced.lock().unwrap().push(handle.raw());
    }

    fn play_emote(&self, handle: EntityHandle, emote_id: &str) {
        self.emotes
            .lock()
            .unwrap()
            .push((handle.raw(), emote_id.to_owned()));
    }

    fn refresh_name_tags(&self, _handle: EntityHandle, _display_name: &str, _score_tag: &str) {}
}

#[derive(Default)]
struct MockGateway {
    messages: Mutex<Vec<(ActorId, String)>>,
    commands: Mutex<Vec<(CommandOrigin, String)>>,
    dialogs: Mutex<Vec<ResolvedDialog>>,
}

impl PlayerGateway for MockGateway {
    fn send_message(&self, actor: &ActorId, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((*actor, message.to_owned()));
    }

    fn execute_command(&self, origin: CommandOrigin, command: &str) -> bool {
        self.commands
            .lock()
            .unwrap()
            .push((origin, command.to_owned()));
        true
    }

    fn show_dialog(&self, _actor: &ActorId, _source: EntityHandle, dialog: ResolvedDialog) {
        self.dialogs.lock().unwrap().push(dialog);
    }
}

/// Substitutes `{player_name}` from a fixed actor-name table.
struct NameTable {
    names: HashMap<ActorId, String>,
}

impl PlaceholderResolver for NameTable {
    fn resolve(&self, actor: &ActorId, template: &str) -> String {
        match self.names.get(actor) {
            Some(name) => template.replace("{player_name}", name),
            None => template.to_owned(),
        }
    }
}

struct Harness {
    service: NpcService,
    engine: Arc<MockEngine>,
    gateway: Arc<MockGateway>,
    alice: ActorId,
    dir: tempfile::TempDir,
}

fn harness(worlds: &[&str]) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = RuntimeConfig::new(dir.path());
    let engine = Arc::new(MockEngine::new(worlds));
    let gateway = Arc::new(MockGateway::default());
    let alice = ActorId::new(Uuid::new_v4());
    let resolver = NameTable {
        names: HashMap::from([(alice, "Alice".to_owned())]),
    };

    let service = NpcService::new(
        config,
        Arc::clone(&engine) as Arc<dyn EngineBridge>,
        Arc::clone(&gateway) as Arc<dyn PlayerGateway>,
        Arc::new(resolver),
    )
    .unwrap();

    Harness {
        service,
        engine,
        gateway,
        alice,
        dir,
    }
}

fn write_npc(data_dir: &Path, name: &str, contents: &str) {
    fs::write(data_dir.join("npcs").join(format!("{name}.toml")), contents).unwrap();
}

const GUIDE: &str = r#"
display_name = "&bTown Guide"
click_cooldown = 20

[position]
world = "main"
x = 10.0
y = 65.0
z = 10.0

[[actions]]
kind = "message"
value = "Hello {player_name}"
"#;

#[test]
fn click_runs_actions_and_respects_cooldown() {
    let h = harness(&["main"]);
    write_npc(h.dir.path(), "guide", GUIDE);
    h.service.reload_all();

    assert!(h.service.runtime().is_spawned("guide"));
    let handle = h.service.runtime().handle_of("guide").unwrap();

    let start = Instant::now();

    // First click is accepted and the message is personalized.
    assert!(h.service.runtime().handle_interact_at(&h.alice, handle, start));
    {
        let messages = h.gateway.messages.lock().unwrap();
        assert_eq!(messages.as_slice(), &[(h.alice, "Hello Alice".to_owned())]);
    }

    // A second click inside the 20-tick (1000 ms) window is suppressed.
    assert!(!h.service.runtime().handle_interact_at(
        &h.alice,
        handle,
        start + Duration::from_millis(500)
    ));
    assert_eq!(h.gateway.messages.lock().unwrap().len(), 1);

    // Past the window the next click goes through again.
    assert!(h.service.runtime().handle_interact_at(
        &h.alice,
        handle,
        start + Duration::from_millis(1100)
    ));
    assert_eq!(h.gateway.messages.lock().unwrap().len(), 2);
}

#[test]
fn deleting_a_spawned_npc_removes_entity_then_file() {
    let h = harness(&["main"]);
    let npcs_dir = h.dir.path().join("npcs");
    write_npc(h.dir.path(), "guide", GUIDE);
    h.service.reload_all();

    let handle = h.service.runtime().handle_of("guide").unwrap();
    assert!(h.service.delete_npc("guide").unwrap());

    assert!(h.engine.despawned.lock().unwrap().contains(&handle.raw()));
    assert!(!npcs_dir.join("guide.toml").exists());
    assert!(!h.service.has_npc("guide"));
    assert!(h.service.runtime().resolve_by_entity(handle).is_none());
}

#[test]
fn spawning_into_an_unknown_world_is_reported() {
    let h = harness(&["main"]);
    write_npc(
        h.dir.path(),
        "ghost",
        r#"
[position]
world = "void"
"#,
    );
    h.service.reload_all();

    assert!(!h.service.runtime().is_spawned("ghost"));
    let error = h.service.spawn("ghost").unwrap_err();
    assert!(matches!(
        error,
        NpcError::Spawn(SpawnError::UnknownWorld(world)) if world == "void"
    ));
}

#[test]
fn dialog_action_presents_and_buttons_re_enter_pipeline() {
    let h = harness(&["main"]);
    let data_dir = h.dir.path();
    fs::write(
        data_dir.join("dialogs").join("greet.toml"),
        r#"
title = "&aWelcome, {player_name}"
body = "What can I do for you?"

[[buttons]]
label = "Shop"
commands = ["/shop open {player_name}"]
message = "Enjoy, {player_name}!"
"#,
    )
    .unwrap();
    write_npc(
        data_dir,
        "clerk",
        r#"
[position]
world = "main"

[[actions]]
kind = "dialog"
value = "greet"
"#,
    );
    h.service.reload_all();

    let handle = h.service.runtime().handle_of("clerk").unwrap();
    assert!(h.service.handle_interact(&h.alice, handle));

    let dialog = {
        let dialogs = h.gateway.dialogs.lock().unwrap();
        dialogs.first().cloned().unwrap()
    };
    assert_eq!(dialog.title, "§aWelcome, Alice");
    assert_eq!(dialog.buttons.len(), 1);

    // The host hands the pressed button back to the pipeline.
    h.service
        .runtime()
        .pipeline()
        .run_button(&h.alice, &dialog.buttons[0]);

    let commands = h.gateway.commands.lock().unwrap();
    assert_eq!(
        commands.as_slice(),
        &[(CommandOrigin::Server, "shop open Alice".to_owned())]
    );
    let messages = h.gateway.messages.lock().unwrap();
    assert_eq!(messages.last().unwrap().1, "Enjoy, Alice!");
}

#[test]
fn reload_all_respawns_from_fresh_definitions() {
    let h = harness(&["main"]);
    let data_dir = h.dir.path();
    write_npc(data_dir, "guide", GUIDE);
    h.service.reload_all();
    let first_handle = h.service.runtime().handle_of("guide").unwrap();

    // Operator edits the file, then reloads.
    write_npc(data_dir, "guide", &GUIDE.replace("&bTown Guide", "&cNew Guide"));
    h.service.reload_all();

    let second_handle = h.service.runtime().handle_of("guide").unwrap();
    assert_ne!(first_handle, second_handle, "respawn must mint a new entity");
    assert_eq!(
        h.service.definition("guide").unwrap().display_name,
        "&cNew Guide"
    );
    assert!(h.engine.despawned.lock().unwrap().contains(&first_handle.raw()));
}

#[test]
fn tick_plays_emotes_on_their_interval() {
    let h = harness(&["main"]);
    write_npc(
        h.dir.path(),
        "dancer",
        r#"
look_at_viewer = true

[position]
world = "main"

[emote]
id = "wave"
interval = 100
"#,
    );
    h.service.reload_all();
    let handle = h.service.runtime().handle_of("dancer").unwrap();

    h.service.tick(50);
    assert!(h.engine.emotes.lock().unwrap().is_empty());

    h.service.tick(100);
    h.service.tick(150);
    {
        let emotes = h.engine.emotes.lock().unwrap();
        assert_eq!(emotes.as_slice(), &[(handle.raw(), "wave".to_owned())]);
    }

    // The next interval elapses relative to the last play.
    h.service.tick(200);
    assert_eq!(h.engine.emotes.lock().unwrap().len(), 2);

    // Look-at updates run every tick for this NPC.
    assert!(h.engine.faced.lock().unwrap().len() >= 4);
}

#[test]
fn spawn_binds_named_skin_and_cape() {
    let h = harness(&["main"]);
    let data_dir = h.dir.path();

    let pixel = image::Rgba([120u8, 80, 40, 255]);
    image::RgbaImage::from_pixel(64, 64, pixel)
        .save(data_dir.join("skins").join("merchant.png"))
        .unwrap();
    image::RgbaImage::from_pixel(64, 32, pixel)
        .save(data_dir.join("capes").join("royal.png"))
        .unwrap();

    write_npc(
        data_dir,
        "merchant",
        r#"
skin = "merchant"
cape = "royal"

[position]
world = "main"
"#,
    );
    write_npc(
        data_dir,
        "stranger",
        r#"
skin = "no_such_skin"

[position]
world = "main"
"#,
    );
    h.service.reload_all();

    let spawned = h.engine.spawned_skins.lock().unwrap();
    let merchant = spawned.iter().find(|(id, _)| id == "merchant").unwrap();
    assert!(merchant.1, "configured cape must be attached at spawn");

    // Unknown skin references fall back to the built-in default, capeless.
    let stranger = spawned.iter().find(|(id, _)| id == "default").unwrap();
    assert!(!stranger.1);
}
