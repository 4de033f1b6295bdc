//! Builds a batch from catalogue descriptors without touching the network, prints the wire
//! payload, and decodes a canned response.

// crates.io
use color_eyre::Result;
// self
use oauth1_batch::{
	call::ApiCall,
	catalogue,
	request::ApiRequest,
	response::BatchResponse,
};

const CANNED_RESPONSE: &str = r#"{
	"general.getPlayer": {"context": {"player": {"name": "Ambre", "level": 42}}},
	"players.getFeed": {"items": [{"id": 9, "text": "Ambre won a tournament"}], "context": {}},
	"characters.getCharacterLevels": {"items": [{"level": 1}, {"level": 2}], "context": {}}
}"#;

fn main() -> Result<()> {
	color_eyre::install()?;

	let mut player = catalogue::GET_PLAYER.instantiate()?;

	player.set_context_filter(["player.name", "player.level"]);

	let mut feed = catalogue::GET_FEED.instantiate()?;

	feed.set_value("nbStoriesMax", 5)?;

	let mut levels = catalogue::GET_CHARACTER_LEVELS.instantiate()?;

	levels.set_value("characterID", 1234)?;
	levels.set_value("imageSize", "small")?;

	let mut request = ApiRequest::new();

	for call in [player, feed, levels] {
		request.enqueue(call)?;
	}

	request.validate()?;

	println!("Payload: {}", request.to_wire_fragment());

	// Names are unique per batch.
	let duplicate = ApiCall::new("players.getFeed")?;

	if let Err(e) = request.enqueue(duplicate) {
		println!("Rejected as expected: {e}");
	}

	let response = BatchResponse::parse(CANNED_RESPONSE)?;
	let player = response.context("general.getPlayer")?;

	println!("Player {} is level {}.", player["player"]["name"], player["player"]["level"]);
	println!("Feed: {}", response.items("players.getFeed")?);

	for call in &request {
		let values = call
			.parameters()
			.filter(|(_, value)| !value.is_unset())
			.map(|(name, value)| format!("{name}={value}"))
			.collect::<Vec<_>>();

		println!("{} sent with [{}].", call.name(), values.join(", "));
	}

	Ok(())
}
