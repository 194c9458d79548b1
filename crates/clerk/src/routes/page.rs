//! The form page.
//!
//! One static document with an inline script that talks to the JSON API,
//! plays whatever cues the session hands back, and renders the captcha modal.
//! Styling is minimal.

use axum::{extract::State, response::Html};

use crate::config::AppConfig;
use crate::state::AppState;

pub async fn form_page(State(state): State<AppState>) -> Html<String> {
    Html(state.page.to_string())
}

/// Fill the page template from configuration
pub fn render_form_page(config: &AppConfig) -> String {
    PAGE_TEMPLATE
        .replace("__SIREN_URL__", &js_string(&config.audio.siren_url))
        .replace("__CUE_BASE_URL__", &js_string(&config.audio.cue_base_url))
        .replace("__REGION_LABEL__", &js_string(&config.region.label))
        .replace("__BIRTH_COLOR__", &js_string(&config.session.birth_color))
}

/// Quote a value for use inside an inline `<script>`
fn js_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace("</", "<\\/")
}

const PAGE_TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Very Important Official Form</title>
  <style>
    body { font-family: monospace; background: #fffbf0; margin: 0; }
    main { max-width: 56rem; margin: 1.5rem auto; border: 5px dotted #ef4444; padding: 1rem 1.5rem; background: #fff; }
    h1 { letter-spacing: .25em; text-transform: uppercase; text-align: center; }
    section { border-bottom: 1px solid #000; padding: 1rem 0; }
    label { display: block; font-size: .7rem; text-transform: uppercase; letter-spacing: .3em; margin-top: .5rem; }
    .alert { color: #991b1b; font-weight: bold; }
    .flash { animation: flash .25s steps(2) infinite; }
    @keyframes flash { 50% { background: #fecaca; } }
    #modal { display: none; position: fixed; inset: 0; background: rgba(0,0,0,.6); }
    #modal > div { background: #fff; width: 24rem; margin: 4rem auto; padding: 1rem; }
    #tiles { display: grid; grid-template-columns: repeat(3, 1fr); gap: 4px; }
    #tiles img { width: 100%; border: 4px solid transparent; cursor: pointer; }
    #tiles img.on { border-color: #2563eb; }
    #confetti { position: fixed; top: 0; left: 50%; font-size: 3rem; pointer-events: none; }
  </style>
</head>
<body>
<main id="page">
  <h1>Very Important Official Form</h1>
  <p><em>Please fill out every field correctly.</em></p>
  <form id="form">
    <section>
      <label for="name">Name</label>
      <input id="name" name="name" required autocomplete="off" placeholder="First and Last Name" />
    </section>
    <section>
      <label for="email">Email</label>
      <input id="email" type="password" required placeholder="••••••••••" />
      <label for="confirm-email">Confirm Email</label>
      <input id="confirm-email" type="password" required placeholder="••••••••••" />
      <p id="email-alert" class="alert"></p>
    </section>
    <section>
      <label for="dob-color">Date of Birth (RGB format only)</label>
      <p>R is your day, G is your month, and B is your birth year (1900-2025).</p>
      <input id="dob-color" type="color" />
      <p>Date: <strong id="dob-date"></strong></p>
      <p>Age: <strong id="dob-age"></strong> years old</p>
    </section>
    <section>
      <label>Place of Residence</label>
      <p>Drop a pin inside <span id="region-label"></span>.</p>
      <input id="lat" type="number" step="any" placeholder="latitude" />
      <input id="lng" type="number" step="any" placeholder="longitude" />
      <button type="button" id="pin">Drop pin</button>
      <p id="pin-result"></p>
    </section>
    <section>
      <button type="button" id="robot">I am not a robot</button>
      <span id="robot-status"></span>
    </section>
    <section>
      <button type="submit">Submit?</button>
    </section>
  </form>
</main>
<div id="modal"><div>
  <p id="prompt"></p>
  <div id="images"><div id="tiles"></div><button type="button" id="verify">Verify</button></div>
  <div id="rps" hidden>
    <p>Wins: <span id="wins"></span></p>
    <button type="button" data-move="rock">Rock</button>
    <button type="button" data-move="paper">Paper</button>
    <button type="button" data-move="scissors">Scissors</button>
    <p>You: <span id="you"></span> Bot: <span id="bot"></span></p>
  </div>
</div></div>
<div id="confetti"></div>
<script>
const SIREN_URL = __SIREN_URL__;
const CUE_BASE_URL = __CUE_BASE_URL__;
const REGION_LABEL = __REGION_LABEL__;
const BIRTH_COLOR = __BIRTH_COLOR__;
const $ = (id) => document.getElementById(id);
let session = null;
let siren = null;

async function api(method, path, body) {
  const res = await fetch(path, {
    method,
    headers: { "content-type": "application/json", "x-form-session": session || "" },
    body: body === undefined ? undefined : JSON.stringify(body),
  });
  return res.ok ? res.json() : null;
}

function audioFor(cue) {
  if (cue === "siren") {
    siren = siren || new Audio(SIREN_URL);
    return siren;
  }
  return new Audio(CUE_BASE_URL + "/" + cue + ".ogg");
}

function applyCue(c) {
  try {
    if (c.kind === "play") { const a = audioFor(c.cue); a.currentTime = 0; a.play().catch(() => {}); }
    else if (c.kind === "loop") { audioFor(c.cue).loop = c.on; }
    else if (c.kind === "stop") { const a = audioFor(c.cue); a.pause(); a.currentTime = 0; }
    else if (c.kind === "confetti") { $("confetti").textContent = "🎉🎊🎉"; setTimeout(() => $("confetti").textContent = "", 1200); }
    else if (c.kind === "close_captcha") { api("POST", "/captcha/close"); }
  } catch (_) {}
}

function renderCaptcha(v) {
  $("modal").style.display = v.stage === "hidden" ? "none" : "block";
  $("prompt").textContent = v.prompt || "Select all images with fire hydrants.";
  $("images").hidden = v.stage !== "images";
  $("rps").hidden = v.stage === "images";
  document.querySelectorAll("#tiles img").forEach((img) => {
    img.classList.toggle("on", v.selected.includes(Number(img.dataset.id)));
  });
  $("wins").textContent = v.rps_wins + " / " + v.required_wins;
  $("you").textContent = v.player_choice || "?";
  $("bot").textContent = v.bot_choice || "?";
  if (v.stage === "complete") $("robot-status").textContent = "✔ verified (probably)";
}

function render(s) {
  s.cues.forEach(applyCue);
  renderCaptcha(s.captcha);
  $("dob-date").textContent = s.birth_date.formatted;
  $("dob-age").textContent = s.birth_date.age;
  $("email-alert").textContent = s.email_alert ? "Emails do not match." : "";
  $("page").classList.toggle("flash", s.email_alert);
  if (s.location) {
    $("pin-result").textContent = s.location.address + (s.location.valid ? " ✔" : " ✘ not in " + s.location.required_region);
  }
}

async function poll() {
  const s = await api("GET", "/session");
  if (s) render(s);
  setTimeout(poll, 200);
}

async function reverseGeocode(lat, lng) {
  const url = "https://nominatim.openstreetmap.org/reverse?format=jsonv2&lat=" + lat + "&lon=" + lng;
  const place = await fetch(url).then((r) => r.json()).catch(() => ({}));
  const address = place.address || {};
  return {
    lat, lng,
    address: place.display_name || "",
    region_code: address["ISO3166-2-lvl4"] || null,
    country_code: address.country_code || null,
  };
}

async function main() {
  session = (await api("POST", "/session", {})).session_id;
  $("region-label").textContent = REGION_LABEL;
  $("dob-color").value = BIRTH_COLOR;

  const tiles = await api("GET", "/captcha/catalog");
  tiles.forEach((t) => {
    const img = document.createElement("img");
    img.src = t.src;
    img.dataset.id = t.id;
    img.onclick = () => api("POST", "/captcha/toggle", { id: t.id });
    $("tiles").appendChild(img);
  });

  const emails = () => api("POST", "/email", { email: $("email").value, confirm_email: $("confirm-email").value });
  $("email").oninput = emails;
  $("confirm-email").oninput = emails;
  $("dob-color").oninput = (e) => api("POST", "/dob", { color: e.target.value });
  $("robot").onclick = () => api("POST", "/captcha/open");
  $("verify").onclick = () => api("POST", "/captcha/submit");
  document.querySelectorAll("[data-move]").forEach((b) => {
    b.onclick = () => api("POST", "/captcha/play", { choice: b.dataset.move });
  });
  $("pin").onclick = async () => {
    const pin = await reverseGeocode(Number($("lat").value), Number($("lng").value));
    api("POST", "/location", pin);
  };
  $("form").onsubmit = async (e) => {
    e.preventDefault();
    const res = await api("POST", "/submit", {});
    alert(res.message);
  };

  poll();
}

main();
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_fully_rendered() {
        let page = render_form_page(&AppConfig::default());
        assert!(!page.contains("__SIREN_URL__"));
        assert!(!page.contains("__CUE_BASE_URL__"));
        assert!(page.contains(r##"const BIRTH_COLOR = "#8f8f8f";"##));
        assert!(page.contains(r#"const REGION_LABEL = "Ontario, Canada";"#));
    }

    #[test]
    fn test_js_string_escapes_script_close() {
        assert_eq!(js_string("a\"</script>"), r#""a\"<\/script>""#);
    }
}
