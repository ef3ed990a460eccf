use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use typesprint::app::{App, Flow};
use typesprint::controller::SessionController;
use typesprint::runtime::{spawn_word_fetch, AppEvent, FixedTicker, Runner, TestEventSource};
use typesprint::timer::Countdown;
use typesprint::word_source::StaticWordSource;
use typesprint::Status;

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless integration using the internal runtime + App without a TTY.
// Verifies that a short timed session completes via Runner/TestEventSource.
#[test]
fn headless_typing_flow_completes() {
    // Arrange: a fast countdown so the test finishes quickly
    let timer = Countdown::new(3).with_period(Duration::from_millis(20));
    let mut app = App::new(SessionController::new(timer), 3);

    let (tx, es) = TestEventSource::channel();
    let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(5)));

    spawn_word_fetch(Box::new(StaticWordSource::new("hi there")), runner.sender())
        .join()
        .unwrap();

    // Producer: start, then type the first word and a typo
    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();
    for c in "hi thrre ".chars() {
        tx.send(key(c)).unwrap();
    }

    // Act: drive the event loop until finished (or bounded steps)
    for _ in 0..500u32 {
        let event = runner.step();
        assert_eq!(app.on_event(event, Instant::now()), Flow::Continue);
        if app.controller.status() == Status::Finished {
            break;
        }
    }

    // Assert: finished with both words scored
    assert_eq!(app.controller.status(), Status::Finished);
    let results = app.controller.results();
    assert_eq!(results.wpm, 1);
    assert_eq!(results.accuracy, 50);
    assert_eq!(app.controller.session().remaining_secs, 10);
}

#[test]
fn headless_countdown_ends_while_keys_keep_arriving() {
    // 2 ticks of 20ms: the session should end ~40ms after start
    let timer = Countdown::new(2).with_period(Duration::from_millis(20));
    let mut app = App::new(SessionController::new(timer), 2);

    let (tx, es) = TestEventSource::channel();
    let runner = Runner::new(es, FixedTicker::default());
    tx.send(AppEvent::Words(vec!["a".into()])).unwrap();
    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();

    // Producer: a space every 5ms, well inside the runner's idle interval
    let producer = std::thread::spawn(move || {
        for _ in 0..200u32 {
            if tx.send(key(' ')).is_err() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    });

    let started = Instant::now();
    while app.controller.status() != Status::Finished
        && started.elapsed() < Duration::from_secs(2)
    {
        app.on_event(runner.step(), Instant::now());
    }
    let elapsed = started.elapsed();
    let scored = app.controller.tally().total();

    // keys that keep coming after expiry must not be scored
    for _ in 0..10u32 {
        app.on_event(runner.step(), Instant::now());
    }
    drop(runner);
    producer.join().unwrap();

    assert_eq!(app.controller.status(), Status::Finished);
    assert!(elapsed < Duration::from_millis(500), "finished after {elapsed:?}");
    assert_eq!(app.controller.tally().total(), scored);
}

#[test]
fn headless_keys_before_words_arrive_are_ignored() {
    let mut app = App::new(SessionController::default(), 10);
    let now = Instant::now();

    for c in "abc".chars() {
        app.on_event(key(c), now);
    }
    assert_eq!(app.controller.typed(), "");

    app.on_event(AppEvent::Words(vec!["abc".into()]), now);
    assert_eq!(app.controller.words().len(), 1);
    assert_eq!(app.controller.status(), Status::Waiting);
}

#[test]
fn headless_timed_session_finishes_by_time() {
    let timer = Countdown::new(1).with_period(Duration::from_millis(10));
    let mut app = App::new(SessionController::new(timer), 1);

    let (tx, es) = TestEventSource::channel();
    let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(5)));
    tx.send(AppEvent::Words(Vec::new())).unwrap();
    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();

    for _ in 0..200u32 {
        // up to ~1s
        app.on_event(runner.step(), Instant::now());
        if app.controller.status() == Status::Finished {
            break;
        }
    }

    assert_eq!(
        app.controller.status(),
        Status::Finished,
        "timed session should finish by timeout"
    );
}
