//! End-to-end behaviour of the controller over an in-memory store

use chrono::{DateTime, Duration, Local, TimeZone};
use ticklist_core::persist::{TASKS_KEY, decode_tasks, encode_tasks};
use ticklist_core::{
    Action, CategoryFilter, Controller, EntryForm, MemoryStore, NewTask, Notifier, Permission,
    Priority, PriorityFilter, ReminderPolicy, Result, SortKey, TaskId, TaskList,
};

fn at(minute: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 1, 9, minute, 0).unwrap()
}

fn fresh() -> Controller<MemoryStore> {
    Controller::load(MemoryStore::new())
}

fn visible_texts(controller: &Controller<MemoryStore>) -> Vec<String> {
    controller
        .visible_tasks()
        .iter()
        .map(|t| t.text.clone())
        .collect()
}

#[test]
fn add_grows_collection_by_one_with_incomplete_task() {
    let mut controller = fresh();
    for (i, text) in ["one", "two", "three"].iter().enumerate() {
        let before = controller.tasks().len();
        let id = controller.add(NewTask::new(*text)).unwrap();
        assert_eq!(controller.tasks().len(), before + 1);
        assert!(!controller.get(&id).unwrap().completed);
        assert_eq!(controller.tasks().len(), i + 1);
    }
}

#[test]
fn toggle_twice_restores_completion() {
    let mut controller = fresh();
    let id = controller.add(NewTask::new("flip")).unwrap();

    controller.toggle_complete(&id);
    assert!(controller.get(&id).unwrap().completed);
    controller.toggle_complete(&id);
    assert!(!controller.get(&id).unwrap().completed);
}

#[test]
fn clear_completed_keeps_active_subsequence() {
    let mut controller = fresh();
    let ids: Vec<TaskId> = (0..6)
        .map(|i| {
            controller
                .add_at(NewTask::new(format!("task {}", i)), at(i))
                .unwrap()
        })
        .collect();
    for id in ids.iter().step_by(2) {
        controller.toggle_complete(id);
    }

    let expected: Vec<String> = controller
        .tasks()
        .iter()
        .filter(|t| !t.completed)
        .map(|t| t.text.clone())
        .collect();

    controller.dispatch(Action::ClearCompleted);
    let remaining: Vec<String> = controller.tasks().iter().map(|t| t.text.clone()).collect();
    assert_eq!(remaining, expected);
    assert_eq!(remaining, vec!["task 1", "task 3", "task 5"]);
}

#[test]
fn priority_sort_ignores_creation_order() {
    let mut controller = fresh();
    controller.add_at(NewTask::new("medium").with_priority(Priority::Medium), at(0));
    controller.add_at(NewTask::new("low").with_priority(Priority::Low), at(1));
    controller.add_at(NewTask::new("high").with_priority(Priority::High), at(2));

    controller.set_sort_key(SortKey::Priority);
    controller.toggle_sort_direction();
    assert_eq!(visible_texts(&controller), vec!["high", "medium", "low"]);

    controller.toggle_sort_direction();
    assert_eq!(visible_texts(&controller), vec!["low", "medium", "high"]);
}

#[test]
fn undated_tasks_sort_after_dated_ones() {
    let mut controller = fresh();
    controller.add_at(NewTask::new("undated"), at(0));
    controller.add_at(NewTask::new("later").with_due(Some(at(50))), at(1));
    controller.add_at(NewTask::new("sooner").with_due(Some(at(40))), at(2));

    controller.set_sort_key(SortKey::Due);
    assert_eq!(visible_texts(&controller), vec!["later", "sooner", "undated"]);

    controller.toggle_sort_direction();
    assert_eq!(visible_texts(&controller), vec!["sooner", "later", "undated"]);
}

#[test]
fn serialized_collection_round_trips_exactly() {
    let mut controller = fresh();
    let created = at(5) + Duration::milliseconds(789);
    controller.add_at(
        NewTask::new("full")
            .with_priority(Priority::High)
            .with_due(Some(created + Duration::days(1)))
            .with_reminder(Some(created + Duration::hours(3))),
        created,
    );
    controller.add_at(NewTask::new("bare"), at(6));

    let encoded = encode_tasks(controller.tasks()).unwrap();
    let decoded = decode_tasks(&encoded).unwrap();
    assert_eq!(decoded, controller.tasks());

    let reloaded = Controller::load(controller.store().clone());
    assert_eq!(reloaded.tasks(), controller.tasks());
}

#[test]
fn buy_milk_scenario() {
    let mut controller = fresh();
    controller.add(NewTask::new("Buy milk").with_priority(Priority::High));

    controller.set_filter(CategoryFilter::Active);
    controller.set_priority_filter(PriorityFilter::Only(Priority::High));
    assert_eq!(visible_texts(&controller), vec!["Buy milk"]);

    controller.set_filter(CategoryFilter::Completed);
    assert!(controller.visible_tasks().is_empty());

    controller.set_filter(CategoryFilter::All);
    controller.set_priority_filter(PriorityFilter::Only(Priority::Low));
    assert!(controller.visible_tasks().is_empty());
}

#[test]
fn complete_first_then_clear_scenario() {
    let mut controller = fresh();
    let first = controller.add_at(NewTask::new("first"), at(0)).unwrap();
    let second = controller.add_at(NewTask::new("second"), at(1)).unwrap();

    controller.toggle_complete(&first);
    controller.clear_completed();

    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.tasks()[0].id(), &second);
}

#[test]
fn invalid_stored_text_loads_empty() {
    let store = MemoryStore::new().with_entry(TASKS_KEY, "this is not json");
    let controller = Controller::load(store);
    assert!(controller.tasks().is_empty());
}

#[test]
fn form_and_list_drive_the_controller() {
    let mut controller = fresh();
    let mut form = EntryForm::new();
    let mut list = TaskList::new();

    form.set_text("write report");
    form.set_priority(Priority::Low);
    let new_task = form.submit().unwrap();
    controller.dispatch(new_task.into());

    let id = controller.tasks()[0].id().clone();
    let task = controller.get(&id).unwrap().clone();
    assert!(list.start_edit(&task));
    list.set_buffer_text("write final report");
    list.cycle_buffer_priority();
    let event = list.save().unwrap();
    controller.dispatch(event.into());

    let task = controller.get(&id).unwrap();
    assert_eq!(task.text, "write final report");
    assert_eq!(task.priority, Priority::High);

    let event = list.delete(&id);
    controller.dispatch(event.into());
    assert!(controller.tasks().is_empty());
}

struct RecordingNotifier {
    permission: Permission,
    requested: usize,
    shown: Vec<String>,
}

impl RecordingNotifier {
    fn new(permission: Permission) -> Self {
        Self {
            permission,
            requested: 0,
            shown: Vec::new(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        self.requested += 1;
        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<()> {
        assert_eq!(title, "Todo Reminder");
        self.shown.push(body.to_string());
        Ok(())
    }
}

#[test]
fn reminders_need_permission_and_skip_completed() {
    let now = at(30);
    let mut controller = fresh().with_policy(ReminderPolicy::EveryPass);
    controller.add_at(NewTask::new("call mom").with_reminder(Some(at(10))), at(0));
    let done = controller
        .add_at(NewTask::new("done already").with_reminder(Some(at(10))), at(1))
        .unwrap();
    controller.add_at(NewTask::new("not yet").with_reminder(Some(at(45))), at(2));
    controller.toggle_complete(&done);

    let mut denied = RecordingNotifier::new(Permission::Default);
    assert_eq!(controller.check_reminders(now, &mut denied), 0);
    assert_eq!(denied.requested, 0);

    let mut granted = RecordingNotifier::new(Permission::Granted);
    assert_eq!(controller.check_reminders(now, &mut granted), 1);
    assert_eq!(controller.check_reminders(now, &mut granted), 1);
    assert_eq!(
        granted.shown,
        vec!["Reminder for task: call mom", "Reminder for task: call mom"]
    );
}

#[test]
fn once_policy_does_not_repeat() {
    let now = at(30);
    let mut controller = fresh();
    controller.add_at(NewTask::new("stand up").with_reminder(Some(at(10))), at(0));

    let mut notifier = RecordingNotifier::new(Permission::Granted);
    assert_eq!(controller.check_reminders(now, &mut notifier), 1);
    assert_eq!(controller.check_reminders(now + Duration::minutes(1), &mut notifier), 0);
}
