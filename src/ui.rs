use crate::models::SessionSnapshot;
use crate::phrases::PhraseCatalog;

pub fn render_index(catalog: &PhraseCatalog, snapshot: &SessionSnapshot) -> String {
    let view = &snapshot.view;
    let (arabic, english) = view
        .phrase
        .as_ref()
        .map(|phrase| (phrase.arabic.as_str(), phrase.english.as_str()))
        .unwrap_or_default();

    INDEX_HTML
        .replace("{{PHRASES}}", &render_phrase_buttons(catalog, snapshot))
        .replace("{{ARABIC}}", &escape(arabic))
        .replace("{{ENGLISH}}", &escape(english))
        .replace("{{COUNTER}}", &view.counter.to_string())
        .replace("{{TARGET}}", &snapshot.target.to_string())
        .replace("{{PROGRESS}}", &view.progress.to_string())
        .replace("{{SESSION}}", &view.session_count.to_string())
        .replace("{{TOTAL}}", &view.total_count.to_string())
        .replace("{{COMPLETION_SEQ}}", &view.completion_seq.to_string())
        .replace("{{FEEDBACK_SEQ}}", &view.feedback_seq.to_string())
}

fn render_phrase_buttons(catalog: &PhraseCatalog, snapshot: &SessionSnapshot) -> String {
    catalog
        .iter()
        .map(|phrase| {
            let active = snapshot.view.selected.as_ref() == Some(&phrase.id);
            format!(
                r#"<button class="phrase-btn{}" type="button" data-phrase="{}"><span class="arabic">{}</span><span class="english">{}</span></button>"#,
                if active { " active" } else { "" },
                escape(phrase.id.as_str()),
                escape(&phrase.arabic),
                escape(&phrase.english),
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Digital Tasbih</title>
  <style>
    :root {
      --bg-1: #eef5ee;
      --bg-2: #cfe6d2;
      --ink: #1f2b22;
      --accent: #2c5530;
      --accent-2: #4caf50;
      --gold: #ffd700;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(44, 85, 48, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #f7fbf4 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(640px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-family: "Georgia", serif;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .arabic {
      display: block;
      font-size: 1.4rem;
      direction: rtl;
    }

    .english {
      display: block;
      font-size: 0.85rem;
      color: #5f6b60;
    }

    .phrases {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 10px;
    }

    .phrase-btn {
      background: white;
      border: 1px solid rgba(44, 85, 48, 0.15);
      border-radius: 16px;
      padding: 10px;
      cursor: pointer;
    }

    .phrase-btn.active {
      border-color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(76, 175, 80, 0.25);
    }

    .current-phrase {
      text-align: center;
    }

    .current-phrase .arabic {
      font-size: 2rem;
    }

    .counter {
      text-align: center;
      font-size: 4rem;
      font-weight: 600;
      color: var(--accent);
    }

    .progress {
      height: 10px;
      background: rgba(44, 85, 48, 0.1);
      border-radius: 999px;
      overflow: hidden;
    }

    #progressBar {
      height: 100%;
      background: var(--accent-2);
      transition: width 150ms ease;
    }

    .increment {
      appearance: none;
      border: none;
      border-radius: 50%;
      width: 160px;
      height: 160px;
      margin: 0 auto;
      font-size: 1.4rem;
      font-weight: 600;
      color: white;
      background: var(--accent);
      box-shadow: 0 12px 28px rgba(44, 85, 48, 0.35);
      cursor: pointer;
      touch-action: manipulation;
      user-select: none;
    }

    .increment.clicked {
      transform: scale(0.96);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(2, 1fr);
      gap: 12px;
    }

    .stat {
      background: white;
      border-radius: 16px;
      padding: 14px;
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #7d877e;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
    }

    .actions {
      display: flex;
      gap: 12px;
      justify-content: center;
    }

    .actions button {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      cursor: pointer;
    }

    .toast {
      position: fixed;
      bottom: 20px;
      left: 50%;
      transform: translateX(-50%);
      background: rgba(0, 0, 0, 0.8);
      color: #fff;
      padding: 10px 16px;
      border-radius: 8px;
    }

    .hint {
      margin: 0;
      text-align: center;
      color: #6f7a70;
      font-size: 0.85rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>Digital Tasbih</h1>

    <section class="phrases">
        {{PHRASES}}
    </section>

    <section class="current-phrase">
      <span class="arabic" id="phrase-arabic">{{ARABIC}}</span>
      <span class="english" id="phrase-english">{{ENGLISH}}</span>
    </section>

    <div class="counter"><span id="counter">{{COUNTER}}</span> / {{TARGET}}</div>
    <div class="progress"><div id="progressBar" style="width: {{PROGRESS}}%"></div></div>

    <form method="post" action="/tap" id="tap-form">
      <button class="increment" id="incrementBtn" type="submit" aria-label="Increment count">Tap</button>
    </form>

    <section class="panel">
      <div class="stat">
        <span class="label">Session</span>
        <span class="value" id="sessionCount">{{SESSION}}</span>
      </div>
      <div class="stat">
        <span class="label">Total</span>
        <span class="value" id="totalCount">{{TOTAL}}</span>
      </div>
    </section>

    <section class="actions">
      <form method="post" action="/reset" id="reset-form">
        <button type="submit" id="resetSession">Reset session</button>
      </form>
      <button type="button" id="resetAll">Reset all</button>
    </section>

    <p class="hint">Space or + counts, r resets the session. Hold the button to count continuously.</p>
  </main>

  <script>
    const counterEl = document.getElementById('counter');
    const progressEl = document.getElementById('progressBar');
    const sessionEl = document.getElementById('sessionCount');
    const totalEl = document.getElementById('totalCount');
    const arabicEl = document.getElementById('phrase-arabic');
    const englishEl = document.getElementById('phrase-english');
    const incrementBtn = document.getElementById('incrementBtn');
    const phraseButtons = Array.from(document.querySelectorAll('.phrase-btn'));

    let completionSeq = {{COMPLETION_SEQ}};
    let feedbackSeq = {{FEEDBACK_SEQ}};
    let pollTimer = null;
    let pressActive = false;
    let pressQueue = Promise.resolve();

    const toast = (message) => {
      const el = document.createElement('div');
      el.className = 'toast';
      el.textContent = message;
      document.body.appendChild(el);
      setTimeout(() => el.remove(), 2000);
    };

    const updateUI = (data) => {
      counterEl.textContent = data.counter;
      sessionEl.textContent = data.sessionCount;
      totalEl.textContent = data.totalCount;
      progressEl.style.width = data.progress + '%';
      if (data.phrase) {
        arabicEl.textContent = data.phrase.arabic;
        englishEl.textContent = data.phrase.english;
      }
      phraseButtons.forEach((btn) => {
        btn.classList.toggle('active', btn.dataset.phrase === data.selected);
      });
      if (data.completionSeq > completionSeq && data.lastCompletion) {
        toast(data.lastCompletion.message);
      }
      completionSeq = data.completionSeq;
      if (data.feedbackSeq !== feedbackSeq) {
        navigator.vibrate?.(10);
      }
      feedbackSeq = data.feedbackSeq;
    };

    const post = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body || {})
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      updateUI(await res.json());
    };

    const report = (err) => console.error(err);

    // Press events and the click that follows them must reach the server in order.
    const enqueue = (url, body) => {
      pressQueue = pressQueue.then(() => post(url, body)).catch(report);
      return pressQueue;
    };

    const poll = async () => {
      const res = await fetch('/api/state');
      if (res.ok) {
        updateUI(await res.json());
      }
    };

    const beginPress = () => {
      pressActive = true;
      enqueue('/api/press', { event: 'start' });
      clearInterval(pollTimer);
      pollTimer = setInterval(() => poll().catch(report), 100);
    };

    const endPress = (event) => () => {
      if (!pressActive) {
        return;
      }
      pressActive = false;
      clearInterval(pollTimer);
      pollTimer = null;
      enqueue('/api/press', { event });
    };

    document.getElementById('tap-form').addEventListener('submit', (e) => {
      e.preventDefault();
      enqueue('/api/click');
      incrementBtn.classList.add('clicked');
      setTimeout(() => incrementBtn.classList.remove('clicked'), 200);
    });

    incrementBtn.addEventListener('pointerdown', beginPress);
    incrementBtn.addEventListener('pointerup', endPress('end'));
    incrementBtn.addEventListener('pointerleave', endPress('cancel'));
    incrementBtn.addEventListener('pointercancel', endPress('cancel'));

    phraseButtons.forEach((btn) => {
      btn.addEventListener('click', () => post('/api/phrase', { id: btn.dataset.phrase }).catch(report));
    });

    document.getElementById('reset-form').addEventListener('submit', (e) => {
      e.preventDefault();
      post('/api/reset/session').catch(report);
    });

    document.getElementById('resetAll').addEventListener('click', () => {
      const confirmed = confirm('Are you sure you want to reset all counts?');
      post('/api/reset/all', { confirmed }).catch(report);
    });

    document.addEventListener('keydown', (e) => {
      if (e.ctrlKey || e.metaKey || e.altKey) {
        return;
      }
      if (e.code === 'Space' || e.key === '+' || e.key === 'r') {
        e.preventDefault();
        post('/api/key', { code: e.code, key: e.key }).catch(report);
      }
    });
  </script>
</body>
</html>
"#;
